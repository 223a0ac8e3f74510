//! Game and registry configuration

use crate::game::{OutputFormat, OutputMode, VerbosityLevel};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Per-game rules knobs and logging setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_life: i32,
    pub opening_hand_size: usize,
    /// Hand size enforced at Cleanup
    pub max_hand_size: usize,
    /// Fixed shuffle seed; None draws one from entropy
    pub seed: Option<u64>,
    pub verbosity: VerbosityLevel,
    pub output_mode: OutputMode,
    pub output_format: OutputFormat,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_life: 20,
            opening_hand_size: 7,
            max_hand_size: 7,
            seed: None,
            verbosity: VerbosityLevel::Normal,
            output_mode: OutputMode::Stdout,
            output_format: OutputFormat::Text,
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Silent, captured logging and a fixed seed, for tests
    pub fn quiet(seed: u64) -> Self {
        GameConfig {
            seed: Some(seed),
            verbosity: VerbosityLevel::Silent,
            output_mode: OutputMode::Memory,
            ..Self::default()
        }
    }
}

/// Settings for hosting many games at once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Games untouched this long are reaped
    pub idle_timeout_secs: u64,
    pub reap_interval_secs: u64,
    /// Applied to every started game
    pub game: GameConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            idle_timeout_secs: 30 * 60,
            reap_interval_secs: 60,
            game: GameConfig::default(),
        }
    }
}

impl RegistryConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs.max(1))
    }
}
