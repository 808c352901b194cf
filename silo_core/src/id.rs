//! Strongly-typed identifiers for silos and their capabilities.
//!
//! Identities are handed out by an [`IdSource`], so callers that need
//! reproducible runs can swap the random generator for a sequential one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// A type-safe identifier based on UUID.
#[derive(Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Id<M> {
    uuid: Uuid,
    #[serde(skip)]
    _marker: PhantomData<M>,
}

impl<M> Id<M> {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Create an identifier from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Create a nil (all zeros) identifier.
    pub fn nil() -> Self {
        Self::from_uuid(Uuid::nil())
    }
}

// Manual impls so the marker type doesn't need to implement anything.
impl<M> Clone for Id<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Id<M> {}

impl<M> PartialEq for Id<M> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<M> Eq for Id<M> {}

impl<M> std::hash::Hash for Id<M> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<M> Default for Id<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for Id<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.uuid)
    }
}

impl<M> fmt::Display for Id<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<M> FromStr for Id<M> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_uuid(Uuid::parse_str(s)?))
    }
}

/// Marker type for silos.
pub struct SiloMarker;
/// Identifier for a silo.
pub type SiloId = Id<SiloMarker>;

/// Marker type for admin capabilities.
pub struct CapabilityMarker;
/// Identifier for an admin capability.
pub type CapabilityId = Id<CapabilityMarker>;

/// Generator of fresh identities.
///
/// Every call must return a UUID the source has never returned before.
pub trait IdSource {
    fn next_uuid(&mut self) -> Uuid;

    fn next_id<M>(&mut self) -> Id<M>
    where
        Self: Sized,
    {
        Id::from_uuid(self.next_uuid())
    }
}

/// Random v4 identities. The default source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic identities counting up from a starting value.
///
/// Once `u128::MAX` has been handed out the counter is exhausted, and the
/// source continues with random v4 identities instead of wrapping around.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: Option<u128>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(start: u128) -> Self {
        Self { next: Some(start) }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_uuid(&mut self) -> Uuid {
        match self.next {
            Some(value) => {
                self.next = value.checked_add(1);
                Uuid::from_u128(value)
            }
            None => RandomIds.next_uuid(),
        }
    }
}
