use super::SequenceStore;

/// `Vec`-backed sequence store. The default backing for a silo.
#[derive(Debug, Clone)]
pub struct VecStore<T> {
    items: Vec<T>,
}

impl<T> VecStore<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create a store with room for `capacity` items before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }
}

impl<T> Default for VecStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SequenceStore<T> for VecStore<T> {
    fn push(&mut self, item: T) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
