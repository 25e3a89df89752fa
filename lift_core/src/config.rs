//! Configuration file support for Lift Coach.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftcoach/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub session: SessionConfig,
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

/// Suggestion-engine parameters
///
/// The defaults encode the double-progression rule table: grow reps until a
/// rep-range ceiling is hit, then add weight and reset reps to the floor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Weight suggested when an exercise has no history (unloaded bar)
    #[serde(default = "default_starting_weight")]
    pub starting_weight: f64,

    /// Weight added when a rep-range ceiling is reached
    #[serde(default = "default_weight_increment")]
    pub weight_increment: f64,

    /// Most-common-reps at or above this triggers a weight increase (hypertrophy)
    #[serde(default = "default_hypertrophy_rep_ceiling")]
    pub hypertrophy_rep_ceiling: u32,

    /// Most-common-reps above this triggers a weight increase (strength)
    #[serde(default = "default_strength_rep_ceiling")]
    pub strength_rep_ceiling: u32,

    /// Rep target after a hypertrophy weight increase, and the empty-history default
    #[serde(default = "default_hypertrophy_rep_floor")]
    pub hypertrophy_rep_floor: u32,

    /// Rep target after a strength weight increase, and the empty-history default
    #[serde(default = "default_strength_rep_floor")]
    pub strength_rep_floor: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            starting_weight: default_starting_weight(),
            weight_increment: default_weight_increment(),
            hypertrophy_rep_ceiling: default_hypertrophy_rep_ceiling(),
            strength_rep_ceiling: default_strength_rep_ceiling(),
            hypertrophy_rep_floor: default_hypertrophy_rep_floor(),
            strength_rep_floor: default_strength_rep_floor(),
        }
    }
}

/// Session walker parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Rest applied when a planned set does not specify one
    #[serde(default = "default_rest_seconds")]
    pub default_rest_seconds: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_rest_seconds: default_rest_seconds(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("liftcoach")
}

fn default_starting_weight() -> f64 {
    45.0
}

fn default_weight_increment() -> f64 {
    5.0
}

fn default_hypertrophy_rep_ceiling() -> u32 {
    11
}

fn default_strength_rep_ceiling() -> u32 {
    4
}

fn default_hypertrophy_rep_floor() -> u32 {
    8
}

fn default_strength_rep_floor() -> u32 {
    3
}

fn default_rest_seconds() -> u32 {
    90
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
        base.join("liftcoach").join("config.toml")
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
