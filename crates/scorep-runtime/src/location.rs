//! Per-location mutable state and location lifecycle.
//!
//! A location owns an arena nobody else writes to, so it lives in
//! thread-local storage rather than behind a shared lock: only the
//! [`LocationRegistry`] coordinates handing locations out and parking them
//! for reuse. Substrate `on_new_location`/`on_activate` hooks are invoked by
//! the dispatch layer after [`LocationRegistry::activate`] returns, not by
//! this module, so this module stays ignorant of the substrate trait.

use std::any::Any;
use std::cell::RefCell;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use scorep_defs::Paradigm;

use crate::arena::Arena;
use crate::clock_sync::ClockOffset;
use crate::task::TaskManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub u32);

/// A metric sample as last read for a location; the authoritative metric
/// *definition* (name/unit/type) lives in `scorep_defs`, this is just the
/// value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int64(i64),
    Uint64(u64),
    Double(f64),
}

/// Everything mutable that belongs to exactly one location: its arena, its
/// task stack, its clock offset, the last metric values it read, and one
/// opaque slot per registered substrate.
pub struct LocationState {
    pub id: LocationId,
    pub arena: Arena,
    pub tasks: TaskManager,
    pub clock_offset: ClockOffset,
    pub metrics: Vec<MetricValue>,
    substrate_blobs: Vec<Option<Box<dyn Any + Send>>>,
}

impl LocationState {
    pub fn new(id: LocationId, arena_chunk_bytes: usize, thread_id: u64, max_task_depth: usize) -> Self {
        LocationState {
            id,
            arena: Arena::new(arena_chunk_bytes),
            tasks: TaskManager::new(thread_id, max_task_depth),
            clock_offset: ClockOffset {
                offset_time: 0,
                offset: 0,
                stddev: 0.0,
            },
            metrics: Vec::new(),
            substrate_blobs: Vec::new(),
        }
    }

    /// Returns the opaque blob a substrate previously stored at `slot`, if
    /// any. Substrate slot indices are assigned by the substrate manager at
    /// registration time and are stable for the process's lifetime.
    pub fn substrate_blob(&self, slot: usize) -> Option<&(dyn Any + Send)> {
        self.substrate_blobs.get(slot).and_then(|b| b.as_deref())
    }

    pub fn set_substrate_blob(&mut self, slot: usize, blob: Box<dyn Any + Send>) {
        if slot >= self.substrate_blobs.len() {
            self.substrate_blobs.resize_with(slot + 1, || None);
        }
        self.substrate_blobs[slot] = Some(blob);
    }
}

thread_local! {
    static CURRENT: RefCell<Option<LocationState>> = const { RefCell::new(None) };
}

/// Controls how [`LocationRegistry::activate`] decides whether a new
/// team-begin gets a fresh location or reattaches to a previously
/// deactivated one. Matching a structurally unrelated thread's start
/// routine to a parked location is ambiguous in the source this is modeled
/// on, so the default is `Fresh`: reuse is opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReusePolicy {
    Fresh,
    ByParadigm,
    ByParadigmAndStartRoutine,
}

struct Parked {
    paradigm: Paradigm,
    start_routine: u64,
    state: LocationState,
}

/// Owns the process-local id counter and the pool of deactivated locations
/// eligible for reuse. One instance per process.
pub struct LocationRegistry {
    next_id: AtomicU32,
    policy: ReusePolicy,
    parked: Mutex<Vec<Parked>>,
    arena_chunk_bytes: usize,
    max_task_depth: usize,
}

impl LocationRegistry {
    pub fn new(policy: ReusePolicy, arena_chunk_bytes: usize, max_task_depth: usize) -> Self {
        LocationRegistry {
            next_id: AtomicU32::new(0),
            policy,
            parked: Mutex::new(Vec::new()),
            arena_chunk_bytes,
            max_task_depth,
        }
    }

    fn allocate_id(&self) -> LocationId {
        LocationId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Installs a location into the calling thread's TLS slot, reusing a
    /// parked one if the registry's policy allows a match. Returns the
    /// resulting location's id.
    pub fn activate(&self, paradigm: Paradigm, start_routine: u64, thread_id: u64) -> LocationId {
        if self.policy != ReusePolicy::Fresh {
            let mut parked = self.parked.lock().unwrap();
            let position = parked.iter().position(|p| {
                p.paradigm == paradigm
                    && (self.policy == ReusePolicy::ByParadigm || p.start_routine == start_routine)
            });
            if let Some(index) = position {
                let reused = parked.remove(index);
                let id = reused.state.id;
                CURRENT.with(|c| *c.borrow_mut() = Some(reused.state));
                return id;
            }
        }

        let id = self.allocate_id();
        let state = LocationState::new(id, self.arena_chunk_bytes, thread_id, self.max_task_depth);
        CURRENT.with(|c| *c.borrow_mut() = Some(state));
        id
    }

    /// Deactivates the calling thread's current location. Under
    /// `ReusePolicy::Fresh` the location is simply dropped; otherwise it is
    /// parked for a future `activate` to reclaim.
    pub fn deactivate(&self, paradigm: Paradigm, start_routine: u64) {
        let Some(state) = CURRENT.with(|c| c.borrow_mut().take()) else {
            return;
        };
        if self.policy == ReusePolicy::Fresh {
            return;
        }
        self.parked.lock().unwrap().push(Parked {
            paradigm,
            start_routine,
            state,
        });
    }

    pub fn parked_count(&self) -> usize {
        self.parked.lock().unwrap().len()
    }
}

/// Runs `f` against the calling thread's current location, if it has one.
pub fn with_current<R>(f: impl FnOnce(&mut LocationState) -> R) -> Option<R> {
    CURRENT.with(|c| c.borrow_mut().as_mut().map(f))
}

pub fn current_id() -> Option<LocationId> {
    CURRENT.with(|c| c.borrow().as_ref().map(|s| s.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_assigns_dense_monotonic_ids() {
        let registry = LocationRegistry::new(ReusePolicy::Fresh, 4096, 64);
        let a = registry.activate(Paradigm::User, 0, 1);
        registry.deactivate(Paradigm::User, 0);
        let b = registry.activate(Paradigm::User, 0, 2);
        assert_eq!(a, LocationId(0));
        assert_eq!(b, LocationId(1));
    }

    #[test]
    fn fresh_policy_never_reuses_a_deactivated_location() {
        let registry = LocationRegistry::new(ReusePolicy::Fresh, 4096, 64);
        registry.activate(Paradigm::OpenMp, 42, 1);
        registry.deactivate(Paradigm::OpenMp, 42);
        assert_eq!(registry.parked_count(), 0);
    }

    #[test]
    fn by_paradigm_and_start_routine_reuses_a_matching_parked_location() {
        let registry = LocationRegistry::new(ReusePolicy::ByParadigmAndStartRoutine, 4096, 64);
        let first = registry.activate(Paradigm::OpenMp, 42, 1);
        registry.deactivate(Paradigm::OpenMp, 42);
        assert_eq!(registry.parked_count(), 1);
        let reused = registry.activate(Paradigm::OpenMp, 42, 1);
        assert_eq!(first, reused);
        assert_eq!(registry.parked_count(), 0);
    }

    #[test]
    fn by_paradigm_and_start_routine_does_not_reuse_a_different_start_routine() {
        let registry = LocationRegistry::new(ReusePolicy::ByParadigmAndStartRoutine, 4096, 64);
        let first = registry.activate(Paradigm::OpenMp, 42, 1);
        registry.deactivate(Paradigm::OpenMp, 42);
        let second = registry.activate(Paradigm::OpenMp, 99, 1);
        assert_ne!(first, second);
        assert_eq!(registry.parked_count(), 1);
    }

    #[test]
    fn current_location_state_is_reachable_through_with_current() {
        let registry = LocationRegistry::new(ReusePolicy::Fresh, 4096, 64);
        assert!(current_id().is_none());
        registry.activate(Paradigm::User, 0, 1);
        assert!(with_current(|state| state.tasks.current().depth()).is_some());
    }
}
