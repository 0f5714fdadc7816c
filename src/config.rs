// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PointerError, Result};

const CONFIG_FILE: &str = "hand_pointer.json";

/// Tunables for the pointer pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub screen: ScreenGeometry,
    /// Frame geometry assumed until a source reports its own
    pub frame: FrameGeometry,
    /// Inset in camera pixels from each frame edge to the active region
    pub active_region_margin: f64,
    /// Exponential smoothing factor, in (0, 1]. Lower is smoother but laggier.
    pub smoothing_factor: f64,
    pub gestures: GestureThresholds,
    /// Scroll units sent per qualifying frame
    pub scroll_amount: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenGeometry {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

/// Normalized landmark distances that separate one pose from another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Max thumb-to-finger distance that counts as a click pinch
    pub click: f64,
    /// Max index-to-middle distance that enters scroll mode
    pub scroll_mode: f64,
    /// Min thumb-to-index distance required before scrolling
    pub thumb_away: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            screen: ScreenGeometry::default(),
            frame: FrameGeometry::default(),
            active_region_margin: 100.0,
            smoothing_factor: 0.2,
            gestures: GestureThresholds::default(),
            scroll_amount: 120,
        }
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            click: 0.045,
            scroll_mode: 0.06,
            thumb_away: 0.1,
        }
    }
}

impl PointerConfig {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: PointerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Loads `path`, or writes the defaults there when it does not exist yet.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!(
            "Configuration file not found, creating default at {}",
            path.display()
        );
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Per-user config location, or the working directory when none can be determined.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "hand_pointer")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PointerError::InvalidConfig(msg));

        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return invalid(format!(
                "smoothing_factor must be in (0, 1], got {}",
                self.smoothing_factor
            ));
        }
        if !(self.screen.width > 0.0 && self.screen.height > 0.0) {
            return invalid(format!(
                "screen must have positive size, got {}x{}",
                self.screen.width, self.screen.height
            ));
        }
        if self.frame.width == 0 || self.frame.height == 0 {
            return invalid(format!(
                "frame must have positive size, got {}x{}",
                self.frame.width, self.frame.height
            ));
        }
        if !(self.active_region_margin >= 0.0) {
            return invalid(format!(
                "active_region_margin must not be negative, got {}",
                self.active_region_margin
            ));
        }
        let shortest = self.frame.width.min(self.frame.height) as f64;
        if self.active_region_margin * 2.0 >= shortest {
            return invalid(format!(
                "active_region_margin {} leaves no active region in a {}x{} frame",
                self.active_region_margin, self.frame.width, self.frame.height
            ));
        }

        let g = &self.gestures;
        for (name, value) in [
            ("click", g.click),
            ("scroll_mode", g.scroll_mode),
            ("thumb_away", g.thumb_away),
        ] {
            if !(value > 0.0) {
                return invalid(format!(
                    "gesture threshold {} must be positive, got {}",
                    name, value
                ));
            }
        }

        if self.scroll_amount < 0 {
            return invalid(format!(
                "scroll_amount is a magnitude and must not be negative, got {}",
                self.scroll_amount
            ));
        }

        Ok(())
    }
}
