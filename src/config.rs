//! Runtime settings, assembled from the command line in [`crate::handle_clap_matches`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use glam::Vec3;
use log::LevelFilter;

use crate::core::{Camera, Color};
use crate::error::{Error, Result};

/// Window size and near plane pairs the renderer ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Classic,
    Wide,
}

impl Preset {
    pub fn resolution(self) -> (usize, usize) {
        match self {
            Preset::Classic => (800, 800),
            Preset::Wide => (1000, 1000),
        }
    }

    pub fn near(self) -> f32 {
        match self {
            Preset::Classic => 0.25,
            Preset::Wide => 0.3,
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Preset::Classic),
            "wide" => Ok(Preset::Wide),
            other => Err(format!("unknown preset '{other}'")),
        }
    }
}

/// How face colors are chosen at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// `|normal| * 127` per channel
    #[default]
    Normal,
    /// Every face gets the base color
    Flat,
}

impl FromStr for Shading {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Shading::Normal),
            "flat" => Ok(Shading::Flat),
            other => Err(format!("unknown shading mode '{other}'")),
        }
    }
}

impl fmt::Display for Shading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shading::Normal => write!(f, "normal"),
            Shading::Flat => write!(f, "flat"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub model: PathBuf,
    pub triangulate: bool,
    pub width: usize,
    pub height: usize,
    /// Camera space depth at or below which a face is dropped
    pub near: f32,
    /// World units per second
    pub move_speed: f32,
    /// Degrees per pixel of mouse travel
    pub mouse_sensitivity: f32,
    pub target_fps: usize,
    pub draw_outline: bool,
    pub shading: Shading,
    pub base_color: Color,
    pub background: Color,
    pub outline_color: Color,
    /// Where the camera starts, or the single viewpoint in headless mode
    pub camera: Camera,
    /// Render one frame to this file instead of opening a window
    pub headless_output: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl RenderConfig {
    pub fn from_preset(preset: Preset) -> Self {
        let (width, height) = preset.resolution();
        Self {
            model: PathBuf::from("human.obj"),
            triangulate: false,
            width,
            height,
            near: preset.near(),
            move_speed: 5.0,
            mouse_sensitivity: 0.25,
            target_fps: 250,
            draw_outline: true,
            shading: Shading::Normal,
            base_color: Color::TEAL,
            background: Color::BACKGROUND,
            outline_color: Color::OUTLINE,
            camera: Camera::default(),
            headless_output: None,
            log_level: LevelFilter::Info,
            log_file: PathBuf::from("flythrough_renderer.log"),
        }
    }

    /// Reject values the render loop can't work with.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.near.is_finite() || self.near < 0.0 {
            return Err(Error::Config(format!(
                "near plane must be a non-negative number, got {}",
                self.near
            )));
        }
        if !self.move_speed.is_finite() || !self.mouse_sensitivity.is_finite() {
            return Err(Error::Config(
                "speed and sensitivity must be finite".to_string(),
            ));
        }
        if self.target_fps == 0 {
            return Err(Error::Config("target fps must be at least 1".to_string()));
        }
        if !self.camera.position.is_finite() {
            return Err(Error::Config(format!(
                "camera position must be finite, got {}",
                self.camera.position
            )));
        }
        if !self.camera.yaw.is_finite() || !self.camera.pitch.is_finite() {
            return Err(Error::Config(format!(
                "camera angles must be finite, got yaw {} pitch {}",
                self.camera.yaw, self.camera.pitch
            )));
        }
        Ok(())
    }
}

/// Parse `x,y,z` into a vector.
pub fn parse_vec3(s: &str) -> std::result::Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{s}'"));
    }
    let mut out = [0.0f32; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not a number"))?;
    }
    Ok(Vec3::from(out))
}
