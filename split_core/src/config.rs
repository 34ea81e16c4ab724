//! Configuration file support for splitsched.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/splitsched/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub slots: SlotConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Calendar zone and class-detection configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// IANA zone name attached to sink-bound events; all civil times in the
    /// system are interpreted in this zone
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Case-insensitive substrings that mark an event as a fitness class
    #[serde(default = "default_class_markers")]
    pub class_markers: Vec<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            class_markers: default_class_markers(),
        }
    }
}

/// Time-slot rule configuration (times are `HH:MM` strings)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlotConfig {
    #[serde(default = "default_weekday_morning")]
    pub weekday_morning: String,

    #[serde(default = "default_weekday_evening")]
    pub weekday_evening: String,

    #[serde(default = "default_weekend_afternoon")]
    pub weekend_afternoon: String,

    #[serde(default = "default_post_class_buffer")]
    pub post_class_buffer_minutes: u32,

    #[serde(default = "default_cardio_only_minutes")]
    pub cardio_only_minutes: u32,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            weekday_morning: default_weekday_morning(),
            weekday_evening: default_weekday_evening(),
            weekend_afternoon: default_weekend_afternoon(),
            post_class_buffer_minutes: default_post_class_buffer(),
            cardio_only_minutes: default_cardio_only_minutes(),
        }
    }
}

/// Deload parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Deload boundary spacing in full workouts
    #[serde(default = "default_deload_every")]
    pub deload_every: u32,

    /// Multiplier applied to every displayed weight on a deload occurrence
    #[serde(default = "default_deload_factor")]
    pub deload_factor: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            deload_every: default_deload_every(),
            deload_factor: default_deload_factor(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("splitsched")
}

fn default_timezone() -> String {
    "America/New_York".into()
}

fn default_class_markers() -> Vec<String> {
    vec![
        "solidcore".into(),
        "signature50".into(),
        "focus50".into(),
        "advanced65".into(),
    ]
}

fn default_weekday_morning() -> String {
    "07:15".into()
}

fn default_weekday_evening() -> String {
    "20:00".into()
}

fn default_weekend_afternoon() -> String {
    "15:00".into()
}

fn default_post_class_buffer() -> u32 {
    30
}

fn default_cardio_only_minutes() -> u32 {
    25
}

fn default_deload_every() -> u32 {
    8
}

fn default_deload_factor() -> f64 {
    0.8
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("splitsched").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
