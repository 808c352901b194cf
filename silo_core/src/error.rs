//! Error types for silo operations and configuration loading.
//!
//! Every silo failure is a deterministic precondition violation: the
//! operation is rejected before anything is mutated, and retrying with the
//! same inputs in the same state fails the same way.

use crate::id::SiloId;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiloError>;

/// Errors raised by silo operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiloError {
    #[error("Invalid capability for silo {silo}: presented {}", presented_label(.presented))]
    InvalidCapability {
        /// The silo the call targeted.
        silo: SiloId,
        /// The silo the presented capability is bound to, if any was presented.
        presented: Option<SiloId>,
    },

    #[error("Silo is still filling")]
    Filling,

    #[error("Silo is ready and no longer accepts items")]
    Ready,

    #[error("Capacity {requested} is below the current size {size}")]
    CapacityTooLow { requested: usize, size: usize },

    #[error("Silo still holds {size} items")]
    NotEmpty { size: usize },

    #[error("Silo is at its capacity of {capacity} while filling")]
    AtCapacity { capacity: usize },

    #[error("Silo is empty")]
    Empty,

    #[error("Silo is still shared by {handles} handles")]
    Shared { handles: usize },
}

fn presented_label(presented: &Option<SiloId>) -> String {
    match presented {
        Some(id) => format!("capability for silo {}", id),
        None => "no capability".to_string(),
    }
}

impl SiloError {
    /// Whether this failure came from the authorization check rather than
    /// the state machine.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::InvalidCapability { .. })
    }
}

/// A rejected operation that hands its input back.
///
/// `add_item` returns the item it refused and `destroy` returns the silo it
/// refused to tear down, so nothing is lost on failure.
pub struct Rejected<V> {
    /// The value the operation gave back.
    pub value: V,
    /// Why the operation was rejected.
    pub error: SiloError,
}

impl<V> Rejected<V> {
    pub fn new(value: V, error: SiloError) -> Self {
        Self { value, error }
    }

    pub fn into_inner(self) -> V {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Rejected<U> {
        Rejected {
            value: f(self.value),
            error: self.error,
        }
    }
}

impl<V> fmt::Debug for Rejected<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<V> fmt::Display for Rejected<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<V> std::error::Error for Rejected<V> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<V> From<Rejected<V>> for SiloError {
    fn from(rejected: Rejected<V>) -> Self {
        rejected.error
    }
}

/// Errors raised while loading a [`SiloConfig`](crate::config::SiloConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
