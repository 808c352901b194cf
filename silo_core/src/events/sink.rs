use super::SiloEvent;
use std::fmt::Debug;
use tracing::info;

/// Receiver for silo events.
///
/// Sinks must not fail or block; a silo has already committed the change by
/// the time it emits.
pub trait EventSink: Debug + Send + Sync {
    fn emit(&self, event: SiloEvent);
}

/// Drops every event. Used when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: SiloEvent) {}
}

/// Writes each event as an `info`-level tracing record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: SiloEvent) {
        match &event {
            SiloEvent::Created { silo_id, capacity, .. } => {
                info!(%silo_id, capacity, "silo created")
            }
            SiloEvent::ItemAdded { silo_id, position, size, .. } => {
                info!(%silo_id, position, size, "item added")
            }
            SiloEvent::ItemRemoved { silo_id, position, size, .. } => {
                info!(%silo_id, position, size, "item removed")
            }
            SiloEvent::CapacityChanged { silo_id, old, new, .. } => {
                info!(%silo_id, old, new, "capacity changed")
            }
            SiloEvent::BecameReady { silo_id, size, .. } => {
                info!(%silo_id, size, "silo ready")
            }
            SiloEvent::Destroyed { silo_id, .. } => info!(%silo_id, "silo destroyed"),
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn emit(&self, event: SiloEvent) {
        (**self).emit(event)
    }
}
