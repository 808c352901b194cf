//! Silo configuration.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! capacity = 3
//! auth = "required"          # or "unrestricted"
//! zero_capacity = "filling"  # or "ready"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether mutating operations must present the silo's admin capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Every mutation must present the capability minted for the silo.
    #[default]
    Required,
    /// Any holder of a mutable reference may mutate the silo.
    Unrestricted,
}

/// Starting state of a silo created with a capacity of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroCapacity {
    /// Start filling like any other silo. It cannot take items and only
    /// becomes ready through `set_capacity`.
    #[default]
    Filling,
    /// Start ready, since zero items already meets a zero capacity.
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiloConfig {
    /// Number of items the silo collects before it becomes ready.
    pub capacity: usize,

    pub auth: AuthMode,

    pub zero_capacity: ZeroCapacity,
}

impl SiloConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_zero_capacity(mut self, zero_capacity: ZeroCapacity) -> Self {
        self.zero_capacity = zero_capacity;
        self
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check that the settings agree with each other.
    ///
    /// `zero_capacity = "ready"` only applies to a zero capacity; pairing it
    /// with any other capacity is rejected rather than silently ignored.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zero_capacity == ZeroCapacity::Ready && self.capacity != 0 {
            return Err(ConfigError::Invalid(format!(
                "zero_capacity = \"ready\" requires capacity = 0, got {}",
                self.capacity
            )));
        }
        Ok(())
    }

    /// Initial `ready` flag for a silo created from this config.
    pub(crate) fn starts_ready(&self) -> bool {
        self.capacity == 0 && self.zero_capacity == ZeroCapacity::Ready
    }
}

impl Default for SiloConfig {
    fn default() -> Self {
        Self {
            capacity: 1,
            auth: AuthMode::default(),
            zero_capacity: ZeroCapacity::default(),
        }
    }
}
