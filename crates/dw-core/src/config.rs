//! Generation limits
//!
//! Loaded from JSON; any field left out takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default iteration budget for one search
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default minimum number of rooms, start room included
pub const DEFAULT_MIN_ROOMS: usize = 5;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("min_rooms must be at least 1")]
    NoRooms,

    #[error("max_iterations must be at least 1")]
    NoIterations,

    #[error("max_rooms ({max}) is below min_rooms ({min})")]
    MaxBelowMin { min: usize, max: usize },
}

/// Limits for one generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Recursive steps allowed before the attempt is abandoned
    pub max_iterations: u32,
    /// Fewest rooms a finished layout may have
    pub min_rooms: usize,
    /// Most rooms a layout may grow to; unbounded when `None`
    pub max_rooms: Option<usize>,
    /// Seed for catalog ordering; catalog order is used as-is when `None`
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            min_rooms: DEFAULT_MIN_ROOMS,
            max_rooms: None,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_rooms == 0 {
            return Err(ConfigError::NoRooms);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if let Some(max) = self.max_rooms
            && max < self.min_rooms
        {
            return Err(ConfigError::MaxBelowMin {
                min: self.min_rooms,
                max,
            });
        }
        Ok(())
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_min_rooms(mut self, min_rooms: usize) -> Self {
        self.min_rooms = min_rooms;
        self
    }

    pub fn with_max_rooms(mut self, max_rooms: Option<usize>) -> Self {
        self.max_rooms = max_rooms;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
