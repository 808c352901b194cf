use super::{EventSink, SiloEvent};
use crate::id::SiloId;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// In-memory record of silo events, oldest first.
///
/// Clones share the same underlying log, so one clone can be handed to a
/// silo as its sink while another is kept for inspection.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Arc<Mutex<VecDeque<SiloEvent>>>,
    max_size: Option<usize>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::new())),
            max_size: None,
        }
    }

    /// Create a log that keeps only the newest `max_size` events.
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_size))),
            max_size: Some(max_size),
        }
    }

    /// Log a new event, removing the oldest if at capacity
    pub fn append(&self, event: SiloEvent) {
        let mut events = self.events.lock();
        if let Some(max) = self.max_size {
            if max == 0 {
                return;
            }
            if events.len() >= max {
                events.pop_front();
            }
        }
        events.push_back(event);
    }

    /// Get all events
    pub fn all(&self) -> Vec<SiloEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Get events related to a specific silo
    pub fn for_silo(&self, silo_id: SiloId) -> Vec<SiloEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.silo_id() == silo_id)
            .cloned()
            .collect()
    }

    /// Event kinds in order, e.g. `["created", "item_added"]`.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(SiloEvent::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Export the log as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let events = self.all();
        serde_json::to_string_pretty(&events)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: SiloEvent) {
        self.append(event);
    }
}
