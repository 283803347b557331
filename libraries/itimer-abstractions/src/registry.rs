use core::sync::atomic::{AtomicBool, Ordering};

use alloc::sync::Arc;

use crate::TimerKind;

/// Tracks which timer kinds are owned, allowing at most one owner per kind.
///
/// The registry is a shared handle: clones observe and modify the same flags.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    taken: Arc<[AtomicBool; TimerKind::COUNT]>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `kind`, or returns `None` if it is already owned.
    pub fn try_acquire(&self, kind: TimerKind) -> Option<KindGuard> {
        self.taken[kind.index()]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| KindGuard {
                registry: self.clone(),
                kind,
            })
    }

    // only reachable through `KindGuard::drop`, so a held kind cannot be
    // cleared from under its owner
    fn release(&self, kind: TimerKind) {
        self.taken[kind.index()].store(false, Ordering::Release);
    }

    pub fn is_taken(&self, kind: TimerKind) -> bool {
        self.taken[kind.index()].load(Ordering::Acquire)
    }
}

/// Ownership of one timer kind. Dropping it releases the kind.
#[must_use = "the kind is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct KindGuard {
    registry: KindRegistry,
    kind: TimerKind,
}

impl KindGuard {
    pub fn kind(&self) -> TimerKind {
        self.kind
    }
}

impl Drop for KindGuard {
    fn drop(&mut self) {
        self.registry.release(self.kind);
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Barrier, thread};

    use super::*;

    #[test]
    fn test_second_acquire_fails() {
        let registry = KindRegistry::new();

        let guard = registry.try_acquire(TimerKind::Real);
        assert!(guard.is_some());
        assert!(registry.try_acquire(TimerKind::Real).is_none());
        assert!(registry.is_taken(TimerKind::Real));
    }

    #[test]
    fn test_kinds_are_independent() {
        let registry = KindRegistry::new();

        let _real = registry.try_acquire(TimerKind::Real).unwrap();
        let _virt = registry.try_acquire(TimerKind::Virtual).unwrap();
        let _prof = registry.try_acquire(TimerKind::Prof).unwrap();
    }

    #[test]
    fn test_drop_releases() {
        let registry = KindRegistry::new();

        let guard = registry.try_acquire(TimerKind::Prof).unwrap();
        assert_eq!(guard.kind(), TimerKind::Prof);
        drop(guard);

        assert!(!registry.is_taken(TimerKind::Prof));
        assert!(registry.try_acquire(TimerKind::Prof).is_some());
    }

    #[test]
    fn test_held_kind_stays_taken_until_guard_drops() {
        let registry = KindRegistry::new();
        let guard = registry.try_acquire(TimerKind::Real).unwrap();

        // a second handle can observe the kind but has no way to free it
        let other = registry.clone();
        assert!(other.is_taken(TimerKind::Real));
        assert!(other.try_acquire(TimerKind::Real).is_none());
        assert!(registry.try_acquire(TimerKind::Real).is_none());

        drop(guard);
        assert!(!other.is_taken(TimerKind::Real));
    }

    #[test]
    fn test_clones_share_flags() {
        let registry = KindRegistry::new();
        let other = registry.clone();

        let _guard = registry.try_acquire(TimerKind::Virtual).unwrap();
        assert!(other.try_acquire(TimerKind::Virtual).is_none());
    }

    #[test]
    fn test_concurrent_acquire_has_one_winner() {
        const THREADS: usize = 8;

        let registry = KindRegistry::new();
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = registry.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    // leak the winner's guard so the flag stays set
                    registry.try_acquire(TimerKind::Real).map(core::mem::forget)
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .count();

        assert_eq!(winners, 1);
        assert!(registry.is_taken(TimerKind::Real));
    }
}
