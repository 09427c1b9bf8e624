//! Shared access to the current schedule index with whole-index reloads.
//!
//! Queries take a [`snapshot`](IndexHandle::snapshot) and run against it to
//! completion. A reload builds a fresh [`ScheduleIndex`] and swaps it in; later
//! snapshots see the new index, earlier ones keep the old one alive.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::index::ScheduleIndex;

#[derive(Debug, Default)]
pub struct IndexHandle {
    current: RwLock<Arc<ScheduleIndex>>,
}

impl IndexHandle {
    pub fn new(index: ScheduleIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// The index queries should read right now.
    pub fn snapshot(&self) -> Arc<ScheduleIndex> {
        // The lock only guards a pointer swap, so a poisoned lock still holds a
        // complete index.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in `index` and return the one it replaces.
    pub fn replace(&self, index: ScheduleIndex) -> Arc<ScheduleIndex> {
        let next = Arc::new(index);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        info!(
            records = next.len(),
            rooms = next.rooms().len(),
            "Replacing schedule index"
        );
        std::mem::replace(&mut *guard, next)
    }
}
