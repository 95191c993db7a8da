//! Map animation configuration resource.
//!
//! Manages animation tuning loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [animation]
//! step = 0.0005
//! epsilon = 0.0001
//! approach_rate = 0.001
//! mode = shuttle
//!
//! [preview]
//! target_fps = 60
//! frames = 600
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::components::route::{DEFAULT_APPROACH_RATE, DEFAULT_EPSILON, DEFAULT_STEP, RouteMode};

/// Default safe values for startup
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_PREVIEW_FRAMES: u64 = 600;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Map animation configuration resource.
///
/// Routes that do not set their own step or mode fall back to the values
/// here.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Per-tick step in degrees.
    pub step: f64,
    /// Per-axis arrival threshold for ping-pong and approach routes.
    pub epsilon: f64,
    /// Fraction of the remaining difference covered per tick by approach routes.
    pub approach_rate: f64,
    /// Mode for routes that do not name one.
    pub mode: RouteMode,
    /// Frames per second of the paced preview host.
    pub target_fps: u32,
    /// Frames the preview binary runs before unmounting.
    pub preview_frames: u64,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MapConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            step: DEFAULT_STEP,
            epsilon: DEFAULT_EPSILON,
            approach_rate: DEFAULT_APPROACH_RATE,
            mode: RouteMode::Shuttle,
            target_fps: DEFAULT_TARGET_FPS,
            preview_frames: DEFAULT_PREVIEW_FRAMES,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_owned())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [animation] section
        if let Some(step) = config.getfloat("animation", "step").ok().flatten() {
            self.step = step;
        }
        if let Some(epsilon) = config.getfloat("animation", "epsilon").ok().flatten() {
            self.epsilon = epsilon;
        }
        if let Some(rate) = config.getfloat("animation", "approach_rate").ok().flatten() {
            self.approach_rate = rate;
        }
        // The mode is resolved last so it picks up the epsilon and rate above.
        match config.get("animation", "mode") {
            Some(name) => match RouteMode::from_name(&name, self.epsilon, self.approach_rate) {
                Some(mode) => self.mode = mode,
                None => warn!(
                    "Unknown animation mode '{}', keeping {}",
                    name,
                    self.mode.name()
                ),
            },
            None => self.mode = self.refreshed_mode(),
        }

        // [preview] section
        if let Some(fps) = config.getuint("preview", "target_fps").ok().flatten() {
            match u32::try_from(fps) {
                Ok(fps) => self.target_fps = fps,
                Err(_) => warn!(
                    "target_fps {} is out of range, keeping {}",
                    fps, self.target_fps
                ),
            }
        }
        if let Some(frames) = config.getuint("preview", "frames").ok().flatten() {
            self.preview_frames = frames;
        }

        info!(
            "Loaded config: step={}, epsilon={}, approach_rate={}, mode={}, fps={}, frames={}",
            self.step,
            self.epsilon,
            self.approach_rate,
            self.mode.name(),
            self.target_fps,
            self.preview_frames
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [animation] section
        config.set("animation", "step", Some(self.step.to_string()));
        config.set("animation", "epsilon", Some(self.epsilon.to_string()));
        config.set(
            "animation",
            "approach_rate",
            Some(self.approach_rate.to_string()),
        );
        config.set("animation", "mode", Some(self.mode.name().to_owned()));

        // [preview] section
        config.set("preview", "target_fps", Some(self.target_fps.to_string()));
        config.set("preview", "frames", Some(self.preview_frames.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Current default mode with its thresholds taken from this config.
    fn refreshed_mode(&self) -> RouteMode {
        RouteMode::from_name(self.mode.name(), self.epsilon, self.approach_rate)
            .unwrap_or(RouteMode::Shuttle)
    }
}
