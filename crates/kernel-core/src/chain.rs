//! Successor links shared by linkable stages

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Late-bound successor of a chain link.
///
/// Links are wired after construction, so the slot is written once through a
/// shared reference and read on every call.
pub struct Successor<T: ?Sized> {
    next: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Successor<T> {
    pub fn new() -> Self {
        Self {
            next: RwLock::new(None),
        }
    }

    pub fn set(&self, next: Arc<T>) {
        *self.next.write() = Some(next);
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.next.read().clone()
    }

    pub fn is_linked(&self) -> bool {
        self.next.read().is_some()
    }
}

impl<T: ?Sized> Default for Successor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Successor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Successor")
            .field("linked", &self.is_linked())
            .finish()
    }
}
