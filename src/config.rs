//! Tunables for the play field and every entity type.
//!
//! All sections carry `#[serde(default)]`, so a config file only needs the
//! keys it wants to override.  Speeds are in field units per tick.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub lives: u32,
    pub fire_cooldown_ms: f64,
    /// Gap between the ship's bottom edge and the bottom of the field.
    pub bottom_margin: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 30.0,
            speed: 5.0,
            lives: 3,
            fire_cooldown_ms: 250.0,
            bottom_margin: 20.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f64,
    pub height: f64,
    pub base_speed: f64,
    /// Upper (exclusive) bound of the random speed added at spawn.
    pub speed_jitter: f64,
    pub spawn_interval_ms: f64,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 30.0,
            base_speed: 2.0,
            speed_jitter: 2.0,
            spawn_interval_ms: 1500.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BulletConfig {
    pub width: f64,
    pub height: f64,
    pub player_speed: f64,
    pub enemy_speed: f64,
    /// Distance a bullet may travel past the bottom edge before culling.
    pub bottom_slack: f64,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 12.0,
            player_speed: 7.0,
            enemy_speed: 5.0,
            bottom_slack: 50.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    pub images_path: PathBuf,
    pub audio_path: PathBuf,
    /// Asset name → file name relative to `images_path`.
    pub images: BTreeMap<String, String>,
    pub audio: BTreeMap<String, String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            images_path: PathBuf::from("assets/images/"),
            audio_path: PathBuf::from("assets/audio/"),
            images: BTreeMap::new(),
            audio: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub fps: u32,
    pub debug: bool,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub bullet: BulletConfig,
    pub assets: AssetConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            fps: 60,
            debug: true,
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            bullet: BulletConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Reject configs that would make spawn or clamp ranges empty, or feed
    /// NaN/infinity into the per-tick arithmetic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (s, p, e, b) = (&self.screen, &self.player, &self.enemy, &self.bullet);
        for (name, v) in [
            ("screen.width", s.width),
            ("screen.height", s.height),
            ("player.width", p.width),
            ("player.height", p.height),
            ("player.speed", p.speed),
            ("enemy.width", e.width),
            ("enemy.height", e.height),
            ("enemy.base_speed", e.base_speed),
            ("bullet.width", b.width),
            ("bullet.height", b.height),
            ("bullet.player_speed", b.player_speed),
            ("bullet.enemy_speed", b.enemy_speed),
        ] {
            positive(name, v)?;
        }
        for (name, v) in [
            ("player.fire_cooldown_ms", p.fire_cooldown_ms),
            ("player.bottom_margin", p.bottom_margin),
            ("enemy.speed_jitter", e.speed_jitter),
            ("enemy.spawn_interval_ms", e.spawn_interval_ms),
            ("bullet.bottom_slack", b.bottom_slack),
        ] {
            non_negative(name, v)?;
        }

        if p.width >= s.width {
            return Err(ConfigError::Invalid(format!(
                "player width {} does not fit screen width {}",
                p.width, s.width
            )));
        }
        if p.height + p.bottom_margin > s.height {
            return Err(ConfigError::Invalid(format!(
                "player height {} plus bottom margin {} does not fit screen height {}",
                p.height, p.bottom_margin, s.height
            )));
        }
        if e.width >= s.width {
            return Err(ConfigError::Invalid(format!(
                "enemy width {} does not fit screen width {}",
                e.width, s.width
            )));
        }
        if !(e.base_speed + e.speed_jitter).is_finite() {
            return Err(ConfigError::Invalid("enemy speed range overflows".into()));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be non-zero".into()));
        }
        Ok(())
    }
}

fn positive(name: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be a positive number, got {v}")))
    }
}

fn non_negative(name: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be a finite number >= 0, got {v}")))
    }
}
