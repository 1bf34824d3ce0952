// Configuration module for reading Othello.toml
// This module provides OOP-style configuration management for the move selector

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub debug: DebugConfig,
}

/// Timing constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Budget used when the caller does not supply one (the demo binary)
    pub default_time_budget_ms: u64,
    /// Held back from every budget to cover response overhead
    pub safety_margin_ms: u64,
    pub polling_interval_ms: u64,
}

impl TimingConfig {
    /// Computes the effective search budget for a caller budget
    pub fn effective_budget(&self, time_out: Duration) -> Duration {
        time_out.saturating_sub(Duration::from_millis(self.safety_margin_ms))
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_ms)
    }
}

/// Search constants
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub exploration_constant: f64,
    /// Stop after this many iterations even if time remains
    #[serde(default)]
    pub max_iterations: Option<u64>,
    /// Fixed RNG seed; OS entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Othello.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Othello.toml in the working directory
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Othello.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Othello.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                default_time_budget_ms: 5000,
                safety_margin_ms: 300,
                polling_interval_ms: 10,
            },
            search: SearchConfig {
                exploration_constant: 1.4,
                max_iterations: None,
                seed: None,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "othello_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Othello.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
