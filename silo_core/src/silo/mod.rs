//! The silo: a capacity-bounded container that fills, then drains.
//!
//! A silo starts out [`SiloState::Filling`] and accepts items until it holds
//! exactly `capacity` of them. At that point it becomes
//! [`SiloState::Ready`] and only hands items back out, most recent first.
//! Ready is terminal: neither draining nor raising the capacity reopens a
//! silo for filling.
//!
//! Every mutating call first checks the presented [`Credential`] against the
//! silo's identity (unless the silo runs with [`AuthMode::Unrestricted`]),
//! then checks the state machine, and only then mutates. A rejected call
//! leaves the silo exactly as it was.

#[cfg(test)]
mod tests;

use crate::capability::{AdminCapability, Credential};
use crate::config::{AuthMode, SiloConfig};
use crate::error::{Rejected, Result, SiloError};
use crate::events::{EventSink, NullSink, SiloEvent};
use crate::id::{IdSource, RandomIds, SiloId};
use crate::store::{Empty, SequenceStore, VecStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// Lifecycle state of a silo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiloState {
    /// Accepting items, refusing removals.
    Filling,
    /// Handing items out, refusing new ones.
    Ready,
}

impl fmt::Display for SiloState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filling => write!(f, "filling"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// A capacity-bounded, fill-then-drain container of owned items.
pub struct Silo<T, S = VecStore<T>> {
    id: SiloId,
    state: SiloState,
    capacity: usize,
    items: S,
    auth: AuthMode,
    sink: Arc<dyn EventSink>,
    _item: PhantomData<T>,
}

impl<T> Silo<T, VecStore<T>> {
    /// Create a silo with the given capacity, default settings, and a fresh
    /// random identity, together with its admin capability.
    pub fn create(capacity: usize) -> (Self, AdminCapability) {
        Self::create_with(&SiloConfig::new(capacity), &mut RandomIds, Arc::new(NullSink))
    }
}

impl<T, S> Silo<T, S>
where
    S: SequenceStore<T>,
{
    /// Create a silo backed by a default store.
    ///
    /// A default store that already holds items is drained first, so the
    /// silo never starts with items it didn't accept.
    pub fn create_with(
        config: &SiloConfig,
        ids: &mut impl IdSource,
        sink: Arc<dyn EventSink>,
    ) -> (Self, AdminCapability)
    where
        S: Default,
    {
        let store = Empty::prove::<T>(S::default()).unwrap_or_else(|store| {
            warn!(held = store.len(), "default store was not empty, draining it");
            Empty::drain::<T>(store)
        });
        Self::create_in(store, config, ids, sink)
    }

    /// Create a silo backed by a store that has been proven empty.
    pub fn create_in(
        store: Empty<S>,
        config: &SiloConfig,
        ids: &mut impl IdSource,
        sink: Arc<dyn EventSink>,
    ) -> (Self, AdminCapability) {
        let id: SiloId = ids.next_id();
        let capability = AdminCapability::mint(ids.next_id(), id);

        let state = if config.starts_ready() {
            SiloState::Ready
        } else {
            SiloState::Filling
        };

        let silo = Self {
            id,
            state,
            capacity: config.capacity,
            items: store.into_inner(),
            auth: config.auth,
            sink,
            _item: PhantomData,
        };

        debug!(
            silo_id = %id,
            capability_id = %capability.id(),
            capacity = config.capacity,
            auth = ?config.auth,
            %state,
            "silo created"
        );
        silo.sink.emit(SiloEvent::created(id, config.capacity));
        if state == SiloState::Ready {
            silo.sink.emit(SiloEvent::became_ready(id, 0));
        }

        (silo, capability)
    }

    /// Add an item. Only legal while filling.
    ///
    /// The silo becomes ready once the item brings it to capacity. On
    /// rejection the item is handed back inside the error.
    pub fn add_item<'c>(
        &mut self,
        credential: impl Into<Credential<'c>>,
        item: T,
    ) -> std::result::Result<(), Rejected<T>> {
        if let Err(error) = self.authorize(credential.into()) {
            return Err(Rejected::new(item, error));
        }
        if self.state == SiloState::Ready {
            debug!(silo_id = %self.id, "add rejected: silo is ready");
            return Err(Rejected::new(item, SiloError::Ready));
        }
        let size = self.items.len();
        if size >= self.capacity {
            // Only reachable for a silo created filling with capacity zero.
            debug!(silo_id = %self.id, capacity = self.capacity, "add rejected: at capacity");
            return Err(Rejected::new(
                item,
                SiloError::AtCapacity {
                    capacity: self.capacity,
                },
            ));
        }

        self.items.push(item);
        let size = size + 1;
        debug!(silo_id = %self.id, size, capacity = self.capacity, "item added");
        self.sink.emit(SiloEvent::item_added(self.id, size - 1, size));
        self.ready_if_full();
        Ok(())
    }

    /// Remove the most recently added item. Only legal once ready.
    pub fn remove_item<'c>(&mut self, credential: impl Into<Credential<'c>>) -> Result<T> {
        self.authorize(credential.into())?;
        self.ensure_ready()?;

        let item = self.items.pop().ok_or(SiloError::Empty)?;
        self.removed();
        Ok(item)
    }

    /// Remove up to `quantity` items, most recently added first.
    ///
    /// Asking for more than the silo holds is not an error; every remaining
    /// item is returned.
    pub fn remove_items<'c>(
        &mut self,
        credential: impl Into<Credential<'c>>,
        quantity: usize,
    ) -> Result<Vec<T>> {
        self.authorize(credential.into())?;
        self.ensure_ready()?;

        let count = quantity.min(self.items.len());
        let mut removed = Vec::with_capacity(count);
        for _ in 0..count {
            match self.items.pop() {
                Some(item) => {
                    removed.push(item);
                    self.removed();
                }
                None => break,
            }
        }
        Ok(removed)
    }

    /// Remove every item, most recently added first.
    pub fn remove_all<'c>(&mut self, credential: impl Into<Credential<'c>>) -> Result<Vec<T>> {
        let size = self.items.len();
        self.remove_items(credential, size)
    }

    /// Change the capacity. Legal in either state.
    ///
    /// A filling silo whose size now equals its capacity becomes ready. A
    /// ready silo stays ready even if the new capacity exceeds its size.
    pub fn set_capacity<'c>(
        &mut self,
        credential: impl Into<Credential<'c>>,
        new_capacity: usize,
    ) -> Result<()> {
        self.authorize(credential.into())?;

        let size = self.items.len();
        if new_capacity < size {
            debug!(silo_id = %self.id, new_capacity, size, "capacity change rejected");
            return Err(SiloError::CapacityTooLow {
                requested: new_capacity,
                size,
            });
        }

        let old = std::mem::replace(&mut self.capacity, new_capacity);
        debug!(silo_id = %self.id, old, new = new_capacity, "capacity changed");
        self.sink
            .emit(SiloEvent::capacity_changed(self.id, old, new_capacity));
        self.ready_if_full();
        Ok(())
    }

    /// Tear the silo down. It must be empty.
    ///
    /// On rejection the silo is handed back, unchanged, inside the error.
    /// The admin capability is not consumed; dispose of it separately with
    /// [`AdminCapability::destroy`].
    pub fn destroy<'c>(
        self,
        credential: impl Into<Credential<'c>>,
    ) -> std::result::Result<(), Rejected<Self>> {
        if let Err(error) = self.authorize(credential.into()) {
            return Err(Rejected::new(self, error));
        }

        let Silo {
            id,
            state,
            capacity,
            items,
            auth,
            sink,
            _item,
        } = self;

        match Empty::prove::<T>(items) {
            Ok(empty) => {
                empty.dispose();
                debug!(silo_id = %id, "silo destroyed");
                sink.emit(SiloEvent::destroyed(id));
                Ok(())
            }
            Err(items) => {
                let size = items.len();
                debug!(silo_id = %id, size, "destroy rejected: silo not empty");
                let silo = Silo {
                    id,
                    state,
                    capacity,
                    items,
                    auth,
                    sink,
                    _item,
                };
                Err(Rejected::new(silo, SiloError::NotEmpty { size }))
            }
        }
    }

    pub fn id(&self) -> SiloId {
        self.id
    }

    /// Number of items currently held.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn state(&self) -> SiloState {
        self.state
    }

    pub fn is_filling(&self) -> bool {
        self.state == SiloState::Filling
    }

    pub fn is_ready(&self) -> bool {
        self.state == SiloState::Ready
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth
    }

    /// Name of the item type this silo holds.
    pub fn item_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn authorize(&self, credential: Credential<'_>) -> Result<()> {
        match self.auth {
            AuthMode::Unrestricted => Ok(()),
            AuthMode::Required if credential.authorizes(&self.id) => Ok(()),
            AuthMode::Required => {
                let presented = credential.bound_silo();
                warn!(
                    silo_id = %self.id,
                    presented = ?presented,
                    "rejected mutation with invalid capability"
                );
                Err(SiloError::InvalidCapability {
                    silo: self.id,
                    presented,
                })
            }
        }
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.state {
            SiloState::Ready => Ok(()),
            SiloState::Filling => {
                debug!(silo_id = %self.id, "removal rejected: silo is filling");
                Err(SiloError::Filling)
            }
        }
    }

    /// Flip to ready if the silo is filling and exactly full.
    fn ready_if_full(&mut self) {
        if self.state == SiloState::Filling && self.items.len() == self.capacity {
            self.state = SiloState::Ready;
            debug!(silo_id = %self.id, size = self.capacity, "silo ready");
            self.sink.emit(SiloEvent::became_ready(self.id, self.capacity));
        }
    }

    /// Record one item having just been popped.
    fn removed(&self) {
        let size = self.items.len();
        debug!(silo_id = %self.id, size, "item removed");
        self.sink.emit(SiloEvent::item_removed(self.id, size, size));
    }
}

impl<T, S> fmt::Debug for Silo<T, S>
where
    S: SequenceStore<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Silo")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("capacity", &self.capacity)
            .field("size", &self.items.len())
            .field("auth", &self.auth)
            .finish()
    }
}
