//! Per-record write exclusion
//!
//! At most one create/update/delete may be in flight for a given sample id
//! from one client session. A second writer fails fast instead of queueing,
//! which keeps an edit from silently overwriting a concurrent one.

use crate::core_types::SampleId;
use rustc_hash::FxHashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Set of sample ids with a write in progress
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    active: Arc<Mutex<FxHashSet<SampleId>>>,
}

impl InFlightRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for writing. Returns `None` when another write holds it.
    pub fn try_acquire(&self, id: SampleId) -> Option<InFlightGuard> {
        if lock_set(&self.active).insert(id) {
            Some(InFlightGuard {
                id,
                active: Arc::clone(&self.active),
            })
        } else {
            None
        }
    }

    /// Whether a write for `id` is currently in progress
    pub fn is_in_flight(&self, id: SampleId) -> bool {
        lock_set(&self.active).contains(&id)
    }
}

// Inserts and removes are single calls, so a poisoned set is still consistent
fn lock_set(active: &Mutex<FxHashSet<SampleId>>) -> MutexGuard<'_, FxHashSet<SampleId>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases its sample id when dropped
#[derive(Debug)]
pub struct InFlightGuard {
    id: SampleId,
    active: Arc<Mutex<FxHashSet<SampleId>>>,
}

impl InFlightGuard {
    /// Sample id held by this guard
    pub fn id(&self) -> SampleId {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock_set(&self.active).remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let registry = InFlightRegistry::new();
        let guard = registry.try_acquire(SampleId(1)).unwrap();
        assert!(registry.try_acquire(SampleId(1)).is_none());
        assert!(registry.try_acquire(SampleId(2)).is_some());
        assert!(registry.is_in_flight(SampleId(1)));

        drop(guard);
        assert!(!registry.is_in_flight(SampleId(1)));
        assert!(registry.try_acquire(SampleId(1)).is_some());
    }

    #[test]
    fn test_poisoned_registry_still_grants_and_releases() {
        let registry = InFlightRegistry::new();
        let held = registry.try_acquire(SampleId(1)).unwrap();

        let active = Arc::clone(&registry.active);
        let _ = thread::spawn(move || {
            let _lock = active.lock().unwrap();
            panic!("writer crashed");
        })
        .join();
        assert!(registry.active.is_poisoned());

        assert!(registry.try_acquire(SampleId(1)).is_none());
        let other = registry.try_acquire(SampleId(2));
        assert_eq!(other.as_ref().map(InFlightGuard::id), Some(SampleId(2)));

        drop(held);
        assert!(!registry.is_in_flight(SampleId(1)));
        assert!(registry.try_acquire(SampleId(1)).is_some());
    }

    #[test]
    fn test_exactly_one_thread_wins() {
        let registry = InFlightRegistry::new();
        let barrier = Arc::new(std::sync::Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let guard = registry.try_acquire(SampleId(42));
                    barrier.wait();
                    guard.is_some()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(winners, 1);
    }
}
