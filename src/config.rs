use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::entities::Playfield;
use crate::error::ConfigError;
use crate::spawner::MAX_VILLAIN_SIZE;

pub const MAX_FPS: u32 = 240;
pub const MAX_LOADING_TIMEOUT_SECS: f32 = 3600.0;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
}
impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 700.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoadingConfig {
    /// Leave the loading screen after this many seconds even if assets are missing.
    pub timeout_secs: f32,
}
impl Default for LoadingConfig {
    fn default() -> Self {
        Self { timeout_secs: 4.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub fps: u32,
    /// Ring the terminal bell when a villain is eaten.
    pub bell_on_eat: bool,
    /// Directory holding `hero.txt`, `spacecraft.txt` and `octopus.txt`.
    pub assets_dir: Option<PathBuf>,
}
impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            bell_on_eat: true,
            assets_dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: PlayfieldConfig,
    pub loading: LoadingConfig,
    pub display: DisplayConfig,
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let PlayfieldConfig { width, height } = self.playfield;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "playfield must be positive, got {width}x{height}"
            )));
        }
        if width < MAX_VILLAIN_SIZE {
            return Err(ConfigError::Invalid(format!(
                "playfield width {width} is narrower than the largest villain ({MAX_VILLAIN_SIZE})"
            )));
        }
        let fps = self.display.fps;
        if fps == 0 || fps > MAX_FPS {
            return Err(ConfigError::Invalid(format!(
                "fps must be between 1 and {MAX_FPS}, got {fps}"
            )));
        }
        let timeout = self.loading.timeout_secs;
        if !timeout.is_finite() || !(0.0..=MAX_LOADING_TIMEOUT_SECS).contains(&timeout) {
            return Err(ConfigError::Invalid(format!(
                "loading timeout must be 0..={MAX_LOADING_TIMEOUT_SECS} seconds, got {timeout}"
            )));
        }
        Ok(())
    }

    pub fn playfield(&self) -> Playfield {
        Playfield {
            width: self.playfield.width,
            height: self.playfield.height,
        }
    }

    /// Negative or NaN means no wait; anything too large for a `Duration`
    /// waits forever.
    pub fn loading_timeout(&self) -> Duration {
        Duration::try_from_secs_f32(self.loading.timeout_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn frame_duration(&self) -> Duration {
        let fps = self.display.fps.clamp(1, MAX_FPS);
        Duration::from_micros(1_000_000 / u64::from(fps))
    }
}
