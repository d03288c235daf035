//! Table construction parameters.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INITIAL_CAPACITY: usize = 11;
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// Parameters for creating a [`ProbeTable`](crate::ProbeTable).
///
/// Missing fields deserialize to their defaults, so the struct can be
/// embedded in a larger configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub max_load_factor: f64,
}

impl TableConfig {
    pub fn new(initial_capacity: usize, max_load_factor: f64) -> Self {
        Self {
            initial_capacity,
            max_load_factor,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        // Written so NaN fails too.
        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(ConfigError::InvalidLoadFactor(self.max_load_factor));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_LOAD_FACTOR)
    }
}
