use std::{
    collections::VecDeque,
    fmt::Display,
    path::PathBuf,
    str::FromStr,
    time::{Duration, Instant},
};

use clap::{value_parser, Arg, ArgAction, Command};
use glam::Vec3;
use log::LevelFilter;

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod util;

pub use config::{Preset, RenderConfig, Shading};
pub use crate::core::geometry;
pub use crate::core::Camera;
pub use crate::core::Color;
pub use crate::core::Mesh;
pub use error::{Error, MeshError, Result};
pub use util::format_camera;

/// Number of frame times kept for the min/avg/max readout.
const FRAME_HISTORY: usize = 120;

/// Frames per second as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameRate {
    Measured(f32),
    /// The frame took no measurable time
    Overflow,
}

impl FrameRate {
    pub fn from_frame_time(frame_time: Duration) -> Self {
        let secs = frame_time.as_secs_f32();
        if secs <= 0.0 {
            return FrameRate::Overflow;
        }
        let rate = 1.0 / secs;
        if rate.is_finite() {
            FrameRate::Measured(rate)
        } else {
            FrameRate::Overflow
        }
    }
}

impl Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameRate::Measured(rate) => write!(f, "{:.1}", rate),
            FrameRate::Overflow => write!(f, "rate exceeds display precision"),
        }
    }
}

pub struct Metrics {
    pub last_frame: Instant,
    pub frame_time: Duration,
    pub fps_counter: u32,
    pub fps_update_timer: Instant,
    pub current_fps: f32,
    pub frame_times: VecDeque<f32>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
impl Metrics {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            frame_time: Duration::from_secs_f32(1.0 / 60.0),
            fps_counter: 0,
            fps_update_timer: now,
            current_fps: 0.0,
            frame_times: VecDeque::with_capacity(FRAME_HISTORY),
        }
    }

    /// Close the frame ending at `now` and return how long it took.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.update(delta);
        delta
    }

    pub fn update(&mut self, frame_delta: Duration) {
        self.fps_counter += 1;
        self.frame_time = frame_delta;
        if self.frame_times.len() == FRAME_HISTORY {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_delta.as_secs_f32() * 1000.0);
    }

    /// Instantaneous rate from the last frame.
    pub fn frame_rate(&self) -> FrameRate {
        FrameRate::from_frame_time(self.frame_time)
    }

    pub fn average_frame_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }

    /// Roughly once a second, fold the frames counted since the last call
    /// into `current_fps` and return true.
    pub fn poll_report(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.fps_update_timer);
        if elapsed < Duration::from_secs(1) {
            return false;
        }
        self.current_fps = self.fps_counter as f32 / elapsed.as_secs_f32();
        self.fps_counter = 0;
        self.fps_update_timer = now;
        true
    }
}
impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FPS: {:.2} | Avg: {:.2}ms | Min: {:.2}ms | Max: {:.2}ms",
            self.current_fps,
            self.average_frame_ms(),
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::min)
                .unwrap_or(0.0),
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::max)
                .unwrap_or(0.0)
        )
    }
}

fn parse_color(s: &str) -> std::result::Result<Color, String> {
    Color::from_hex(s).map_err(str::to_string)
}

pub fn create_clap_command() -> Command {
    Command::new("flythrough_renderer")
        .about("Painter's algorithm 3D renderer with a free flying camera")
        .version("0.1")
        .arg(
            Arg::new("model")
                .short('f')
                .long("model")
                .value_name("FILE")
                .help("Path to the .obj model to render")
                .value_parser(value_parser!(PathBuf))
                .default_value("human.obj"),
        )
        .arg(
            Arg::new("triangulate")
                .long("triangulate")
                .help("Import through tobj, splitting polygons into triangles")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("preset")
                .short('p')
                .long("preset")
                .value_name("PRESET")
                .help("Resolution and near plane defaults")
                .value_parser(["classic", "wide"])
                .default_value("classic"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("near")
                .long("near")
                .value_name("DEPTH")
                .help("Faces with a vertex at or behind this depth are dropped")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("speed")
                .long("speed")
                .value_name("UNITS")
                .help("Movement speed in world units per second")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("sensitivity")
                .long("sensitivity")
                .value_name("DEGREES")
                .help("Degrees of rotation per pixel of mouse travel")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("fps")
                .long("fps")
                .value_name("FPS")
                .help("Frame rate cap")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("no-outline")
                .long("no-outline")
                .help("Start with polygon outlines off (toggle with E)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("shading")
                .short('s')
                .long("shading")
                .value_parser(["normal", "flat"])
                .default_value("normal"),
        )
        .arg(
            Arg::new("background")
                .long("background")
                .value_name("RRGGBB")
                .value_parser(parse_color),
        )
        .arg(
            Arg::new("outline-color")
                .long("outline-color")
                .value_name("RRGGBB")
                .value_parser(parse_color),
        )
        .arg(
            Arg::new("position")
                .long("position")
                .value_name("X,Y,Z")
                .help("Starting camera position")
                .allow_hyphen_values(true)
                .value_parser(config::parse_vec3),
        )
        .arg(
            Arg::new("yaw")
                .long("yaw")
                .value_name("DEGREES")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("pitch")
                .long("pitch")
                .value_name("DEGREES")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .help("Render a single frame to --output and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .requires("headless")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"])
                .default_value("info"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
}

pub fn handle_clap_matches(matches: &clap::ArgMatches) -> Result<RenderConfig> {
    let preset = matches
        .get_one::<String>("preset")
        .map(|s| s.parse::<Preset>())
        .transpose()
        .map_err(Error::Config)?
        .unwrap_or_default();
    let mut config = RenderConfig::from_preset(preset);

    if let Some(model) = matches.get_one::<PathBuf>("model") {
        config.model = model.clone();
    }
    config.triangulate = matches.get_flag("triangulate");

    if let Some(&width) = matches.get_one::<usize>("width") {
        config.width = width;
    }
    if let Some(&height) = matches.get_one::<usize>("height") {
        config.height = height;
    }
    if let Some(&near) = matches.get_one::<f32>("near") {
        config.near = near;
    }
    if let Some(&speed) = matches.get_one::<f32>("speed") {
        config.move_speed = speed;
    }
    if let Some(&sensitivity) = matches.get_one::<f32>("sensitivity") {
        config.mouse_sensitivity = sensitivity;
    }
    if let Some(&fps) = matches.get_one::<usize>("fps") {
        config.target_fps = fps;
    }

    config.draw_outline = !matches.get_flag("no-outline");
    if let Some(shading) = matches.get_one::<String>("shading") {
        config.shading = shading.parse().map_err(Error::Config)?;
    }
    if let Some(&background) = matches.get_one::<Color>("background") {
        config.background = background;
    }
    if let Some(&outline) = matches.get_one::<Color>("outline-color") {
        config.outline_color = outline;
    }

    let position = matches
        .get_one::<Vec3>("position")
        .copied()
        .unwrap_or(Vec3::ZERO);
    let yaw = matches.get_one::<f32>("yaw").copied().unwrap_or(0.0);
    let pitch = matches.get_one::<f32>("pitch").copied().unwrap_or(0.0);
    config.camera = Camera::new(position, yaw, pitch, 0.0);

    if matches.get_flag("headless") {
        config.headless_output = Some(
            matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("frame.png")),
        );
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.log_level = LevelFilter::from_str(level)
            .map_err(|_| Error::Config(format!("unknown log level '{level}'")))?;
    }
    if let Some(log_file) = matches.get_one::<PathBuf>("log-file") {
        config.log_file = log_file.clone();
    }

    config.validate()?;
    Ok(config)
}
