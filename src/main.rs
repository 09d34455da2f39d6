use std::fs::OpenOptions;
use std::panic;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use log::{debug, error, info, warn};
use minifb::{Window, WindowOptions};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

use flythrough_renderer::{
    core::{CameraController, InputState, MouseTracker},
    create_clap_command, format_camera, handle_clap_matches,
    pipeline::{FrameBuffer, Pipeline},
    Error, Mesh, Metrics, RenderConfig, Result, Shading,
};

fn main() -> ExitCode {
    let matches = create_clap_command().get_matches();
    let config = match handle_clap_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("failed to start logging: {e}");
        return ExitCode::FAILURE;
    }

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        error!("Panic occurred: {:?}", panic_info);
        original_hook(panic_info);
    }));

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &RenderConfig) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    CombinedLogger::init(vec![
        TermLogger::new(
            config.log_level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(config.log_level, Config::default(), log_file),
    ])?;
    Ok(())
}

fn run(config: RenderConfig) -> Result<()> {
    let mesh = load_mesh(&config)?;

    match config.headless_output.clone() {
        Some(output) => run_headless(&config, &mesh, &output),
        None => run_win(&config, &mesh),
    }
}

fn load_mesh(config: &RenderConfig) -> Result<Mesh> {
    let mut mesh = if config.triangulate {
        Mesh::from_wavefront(&config.model, config.base_color)?
    } else {
        Mesh::from_obj(&config.model, config.base_color)?
    };

    if config.shading == Shading::Normal {
        mesh.bake_normals_to_colors();
    }
    if mesh.is_empty() {
        warn!("{:?} has no faces, nothing will be drawn", config.model);
    }
    Ok(mesh)
}

fn run_headless(config: &RenderConfig, mesh: &Mesh, output: &Path) -> Result<()> {
    let mut pipeline = Pipeline::<FrameBuffer>::new(config);
    let stats = pipeline.render_frame(mesh, &config.camera);
    pipeline.buffer().save(output)?;

    info!(
        "wrote {:?}: {}/{} faces visible",
        output, stats.visible, stats.total
    );
    Ok(())
}

pub fn run_win(config: &RenderConfig, mesh: &Mesh) -> Result<()> {
    let mut window = Window::new(
        "Flythrough Renderer",
        config.width,
        config.height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )?;
    window.set_cursor_visibility(false);
    window.set_target_fps(config.target_fps);

    let mut pipeline = Pipeline::<FrameBuffer>::new(config);
    let controller = CameraController::new(config.move_speed, config.mouse_sensitivity);
    let mut camera = config.camera;
    let mut mouse = MouseTracker::default();
    let mut metrics = Metrics::new();
    let mut screenshots = 0u32;

    info!(
        "rendering {} faces at {}x{}, {} shading",
        mesh.faces.len(),
        config.width,
        config.height,
        config.shading
    );

    loop {
        let input = InputState::poll(&window, &mut mouse);
        if input.quit {
            break;
        }

        let delta = metrics.tick(Instant::now());
        controller.update(&mut camera, &input, delta.as_secs_f32() * 1000.0);

        if input.toggle_outline {
            let on = pipeline.toggle_outline();
            info!("outline {}", if on { "on" } else { "off" });
        }

        let stats = pipeline.render_frame(mesh, &camera);
        pipeline.present_window(&mut window)?;

        if input.screenshot {
            let path = format!("screenshot_{:03}.png", screenshots);
            match pipeline.buffer().save(&path) {
                Ok(()) => {
                    info!("saved {}", path);
                    screenshots += 1;
                }
                Err(e) => error!("{}", Error::from(e)),
            }
        }
        if input.dump_camera {
            info!("{}", format_camera(&camera));
        }

        debug!(
            "fps {} | {}/{} faces",
            metrics.frame_rate(),
            stats.visible,
            stats.total
        );
        if metrics.poll_report(Instant::now()) {
            info!("{} | {}/{} faces", metrics, stats.visible, stats.total);
        }
    }

    info!("window closed");
    Ok(())
}
