//! Notifications emitted by silos.
//!
//! Every successful mutation produces a [`SiloEvent`] that is handed to the
//! silo's [`EventSink`]. Sinks are purely observational: a silo behaves the
//! same whether its events are recorded, logged, or dropped.

mod log;
mod sink;

pub use log::EventLog;
pub use sink::{EventSink, NullSink, TracingSink};

use crate::id::SiloId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every silo event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for this event
    pub event_id: Uuid,

    /// When the event occurred
    pub timestamp: DateTime<Utc>,
}

impl EventMetadata {
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Events describing a silo's lifecycle.
///
/// `position` is the index an item occupies (or occupied) in the silo's
/// store, which identifies it among the silo's items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SiloEvent {
    Created {
        silo_id: SiloId,
        capacity: usize,
        metadata: EventMetadata,
    },
    ItemAdded {
        silo_id: SiloId,
        position: usize,
        /// Size after the item went in
        size: usize,
        metadata: EventMetadata,
    },
    ItemRemoved {
        silo_id: SiloId,
        position: usize,
        /// Size after the item came out
        size: usize,
        metadata: EventMetadata,
    },
    CapacityChanged {
        silo_id: SiloId,
        old: usize,
        new: usize,
        metadata: EventMetadata,
    },
    /// The silo switched from filling to ready.
    BecameReady {
        silo_id: SiloId,
        size: usize,
        metadata: EventMetadata,
    },
    Destroyed {
        silo_id: SiloId,
        metadata: EventMetadata,
    },
}

impl SiloEvent {
    pub fn created(silo_id: SiloId, capacity: usize) -> Self {
        Self::Created {
            silo_id,
            capacity,
            metadata: EventMetadata::new(),
        }
    }

    pub fn item_added(silo_id: SiloId, position: usize, size: usize) -> Self {
        Self::ItemAdded {
            silo_id,
            position,
            size,
            metadata: EventMetadata::new(),
        }
    }

    pub fn item_removed(silo_id: SiloId, position: usize, size: usize) -> Self {
        Self::ItemRemoved {
            silo_id,
            position,
            size,
            metadata: EventMetadata::new(),
        }
    }

    pub fn capacity_changed(silo_id: SiloId, old: usize, new: usize) -> Self {
        Self::CapacityChanged {
            silo_id,
            old,
            new,
            metadata: EventMetadata::new(),
        }
    }

    pub fn became_ready(silo_id: SiloId, size: usize) -> Self {
        Self::BecameReady {
            silo_id,
            size,
            metadata: EventMetadata::new(),
        }
    }

    pub fn destroyed(silo_id: SiloId) -> Self {
        Self::Destroyed {
            silo_id,
            metadata: EventMetadata::new(),
        }
    }

    /// The silo this event is about.
    pub fn silo_id(&self) -> SiloId {
        match self {
            Self::Created { silo_id, .. }
            | Self::ItemAdded { silo_id, .. }
            | Self::ItemRemoved { silo_id, .. }
            | Self::CapacityChanged { silo_id, .. }
            | Self::BecameReady { silo_id, .. }
            | Self::Destroyed { silo_id, .. } => *silo_id,
        }
    }

    pub fn metadata(&self) -> &EventMetadata {
        match self {
            Self::Created { metadata, .. }
            | Self::ItemAdded { metadata, .. }
            | Self::ItemRemoved { metadata, .. }
            | Self::CapacityChanged { metadata, .. }
            | Self::BecameReady { metadata, .. }
            | Self::Destroyed { metadata, .. } => metadata,
        }
    }

    /// Short name of the event kind, matching its serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::ItemAdded { .. } => "item_added",
            Self::ItemRemoved { .. } => "item_removed",
            Self::CapacityChanged { .. } => "capacity_changed",
            Self::BecameReady { .. } => "became_ready",
            Self::Destroyed { .. } => "destroyed",
        }
    }
}
