//! A lockable silo handle for multi-threaded hosts.
//!
//! [`Silo`] assumes one writer at a time. [`SharedSilo`] wraps it in a
//! mutex so every operation runs under the lock from authorization to the
//! last mutation, and clones of the handle can be spread across threads.

use crate::capability::Credential;
use crate::error::{Rejected, Result, SiloError};
use crate::id::SiloId;
use crate::silo::{Silo, SiloState};
use crate::store::{SequenceStore, VecStore};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct SharedSilo<T, S = VecStore<T>> {
    inner: Arc<Mutex<Silo<T, S>>>,
}

impl<T, S> Clone for SharedSilo<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, S> SharedSilo<T, S>
where
    S: SequenceStore<T>,
{
    pub fn new(silo: Silo<T, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(silo)),
        }
    }

    pub fn add_item<'c>(
        &self,
        credential: impl Into<Credential<'c>>,
        item: T,
    ) -> std::result::Result<(), Rejected<T>> {
        self.inner.lock().add_item(credential, item)
    }

    pub fn remove_item<'c>(&self, credential: impl Into<Credential<'c>>) -> Result<T> {
        self.inner.lock().remove_item(credential)
    }

    pub fn remove_items<'c>(
        &self,
        credential: impl Into<Credential<'c>>,
        quantity: usize,
    ) -> Result<Vec<T>> {
        self.inner.lock().remove_items(credential, quantity)
    }

    pub fn remove_all<'c>(&self, credential: impl Into<Credential<'c>>) -> Result<Vec<T>> {
        self.inner.lock().remove_all(credential)
    }

    pub fn set_capacity<'c>(
        &self,
        credential: impl Into<Credential<'c>>,
        new_capacity: usize,
    ) -> Result<()> {
        self.inner.lock().set_capacity(credential, new_capacity)
    }

    /// Run several operations under a single lock acquisition.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut Silo<T, S>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Destroy the silo. Fails with [`SiloError::Shared`] while other
    /// handles to it are still alive.
    pub fn destroy<'c>(
        self,
        credential: impl Into<Credential<'c>>,
    ) -> std::result::Result<(), Rejected<Self>> {
        let mutex = match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex,
            Err(inner) => {
                let handles = Arc::strong_count(&inner);
                return Err(Rejected::new(Self { inner }, SiloError::Shared { handles }));
            }
        };
        mutex.into_inner().destroy(credential).map_err(|rejected| rejected.map(Self::new))
    }

    pub fn id(&self) -> SiloId {
        self.inner.lock().id()
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn state(&self) -> SiloState {
        self.inner.lock().state()
    }

    pub fn is_filling(&self) -> bool {
        self.inner.lock().is_filling()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.lock().is_ready()
    }
}

impl<T, S> From<Silo<T, S>> for SharedSilo<T, S>
where
    S: SequenceStore<T>,
{
    fn from(silo: Silo<T, S>) -> Self {
        Self::new(silo)
    }
}
