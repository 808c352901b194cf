//! The sequence store a silo keeps its items in.
//!
//! A silo only ever appends, pops from the end, and asks for the length, so
//! any ordered collection with those operations can back it. Disposal is
//! gated on an [`Empty`] proof: a store can only be torn down once it has
//! been shown to hold nothing.

mod vec;

pub use vec::VecStore;

/// An ordered collection of owned items with stack access at the end.
///
/// Implementations that also implement `Default` must default to an empty
/// store.
pub trait SequenceStore<T> {
    /// Append an item at the end.
    fn push(&mut self, item: T);

    /// Remove and return the last item.
    fn pop(&mut self) -> Option<T>;

    /// Number of items held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Proof that a store holds no items.
///
/// A proof is obtained either by checking a store with [`Empty::prove`] or
/// by emptying it with [`Empty::drain`]. The only way to dispose of a store
/// is to consume its proof.
#[derive(Debug)]
pub struct Empty<S> {
    store: S,
}

impl<S> Empty<S> {
    /// Take ownership of `store` if it is empty, or hand it back otherwise.
    pub fn prove<T>(store: S) -> Result<Self, S>
    where
        S: SequenceStore<T>,
    {
        if store.is_empty() {
            Ok(Self { store })
        } else {
            Err(store)
        }
    }

    /// Put the proven-empty store back to use.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Destroy the proven-empty store.
    pub fn dispose(self) {
        drop(self.store);
    }
}

impl<S> Empty<S> {
    /// Drop every item `store` holds and take the emptied store.
    pub fn drain<T>(mut store: S) -> Self
    where
        S: SequenceStore<T>,
    {
        while !store.is_empty() {
            if store.pop().is_none() {
                break;
            }
        }
        Self { store }
    }
}
