//! Solver configuration
//!
//! Settings can come from a JSON document, from string parameters forwarded
//! through [`Algorithm::set_parameter`](crate::algorithm::traits::Algorithm),
//! or from code. Missing JSON fields take their defaults.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::traits::Capacity;

/// Capacity of every sink to super-sink arc unless per-sink bounds are given
pub const DEFAULT_SINK_CAPACITY: Capacity = 100_000;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings shared by every solve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Capacity of the arcs wiring sinks to the super-sink
    pub sink_capacity: Capacity,
    /// Check flow invariants after each solve
    pub verify_invariants: bool,
    /// Emit one trace record per augmenting path
    pub log_augmentations: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            sink_capacity: DEFAULT_SINK_CAPACITY,
            verify_invariants: false,
            log_augmentations: false,
        }
    }
}

impl SolverConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.sink_capacity < 0 {
            return Err(ConfigError::InvalidValue {
                field: "sink_capacity",
                reason: format!("must be non-negative, got {}", self.sink_capacity),
            });
        }
        Ok(())
    }
}
