//! Engine configuration.
//!
//! Holds the fight tuning plus the match-runner settings (seed, frame rate,
//! character picks). Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use cucina_gameplay::{archetype, FightConfig};

/// Configuration file name.
pub const CONFIG_FILE: &str = "cucina.toml";

/// Errors raised while reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config I/O failed: {0}")]
    Io(#[from] io::Error),

    /// File is not valid TOML for this configuration
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be encoded
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Match Settings ===
    /// Random seed (None = random)
    pub seed: Option<u64>,
    /// Character in slot one (None = random)
    pub player_one: Option<String>,
    /// Character in slot two (None = random)
    pub player_two: Option<String>,
    /// Simulated time after which an unfinished match is abandoned
    pub max_match_seconds: f32,

    // === Timing Settings ===
    /// Target frames per second
    pub target_fps: u32,
    /// Pace frames in wall-clock time instead of running flat out
    pub realtime: bool,

    // === Output Settings ===
    /// Print the final snapshot as JSON
    pub print_snapshot: bool,

    /// Fight tuning
    pub fight: FightConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player_one: None,
            player_two: None,
            max_match_seconds: 120.0,

            target_fps: 60,
            realtime: false,

            print_snapshot: true,

            fight: FightConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            },
        }
    }

    /// Reads and parses a config file, failing on any error.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    /// Validate and clamp configuration values to sensible ranges.
    ///
    /// Character picks that are not on the roster are dropped so a random
    /// character is used instead.
    pub fn validate(&mut self) {
        self.target_fps = self.target_fps.clamp(10, 240);
        self.max_match_seconds = self.max_match_seconds.clamp(10.0, 3_600.0);

        for pick in [&mut self.player_one, &mut self.player_two] {
            if let Some(id) = pick.as_deref() {
                if archetype(id).is_none() {
                    warn!("Unknown character {id:?} in config, picking at random");
                    *pick = None;
                }
            }
        }

        self.fight.validate();
    }
}
