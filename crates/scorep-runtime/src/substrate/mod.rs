//! Substrate manager and event dispatch.
//!
//! A substrate is a callback set indexed by event kind. The manager keeps a
//! `Vec<Box<dyn Substrate>>` rather than the per-event-kind function-pointer
//! array the source builds at startup: dynamic dispatch through a trait
//! object is the same cost on the hot path and needs no unsafe vtable
//! construction. Recording on/off only ever changes *which* substrates run,
//! never adds event kinds, so one `active_indices` computation per
//! transition is enough.

pub mod profile;
pub mod trace;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use scorep_defs::{CommHandle, MetricHandle, RegionHandle, RmaWinHandle};

use crate::location::{LocationId, MetricValue};

pub trait Substrate: Send + Sync + std::any::Any {
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn std::any::Any;

    /// Substrates that must stay consistent while tracing is paused (the
    /// profile substrate) opt in here; the default is to go quiet with
    /// everything else when recording is switched off.
    fn receives_while_recording_off(&self) -> bool {
        false
    }

    fn on_new_location(&self, _location: LocationId) {}
    fn on_activate(&self, _location: LocationId) {}
    fn on_enter_region(&self, _location: LocationId, _region: RegionHandle, _timestamp: u64) {}
    fn on_exit_region(&self, _location: LocationId, _region: RegionHandle, _timestamp: u64) {}
    fn on_sample(&self, _location: LocationId, _timestamp: u64) {}
    fn on_metric(&self, _location: LocationId, _metric: MetricHandle, _value: MetricValue, _timestamp: u64) {}
    fn on_mpi_send(&self, _location: LocationId, _comm: CommHandle, _dest_rank: i32, _bytes: u64, _timestamp: u64) {}
    fn on_rma_get(&self, _location: LocationId, _window: RmaWinHandle, _remote_rank: i32, _bytes: u64, _timestamp: u64) {}
    fn on_io_begin(&self, _location: LocationId, _handle: u64, _timestamp: u64) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    On,
    Off,
}

/// Enumerates the two built-in substrates plus any registered plugin
/// substrates and dispatches every event kind to the ones currently active.
pub struct SubstrateManager {
    substrates: RwLock<Vec<Box<dyn Substrate>>>,
    recording_on: AtomicBool,
}

impl SubstrateManager {
    pub fn new() -> Self {
        SubstrateManager {
            substrates: RwLock::new(Vec::new()),
            recording_on: AtomicBool::new(true),
        }
    }

    /// Registers a substrate and returns its stable slot index, used by
    /// `LocationState::set_substrate_blob`.
    pub fn register(&self, substrate: Box<dyn Substrate>) -> usize {
        let mut substrates = self.substrates.write().unwrap();
        substrates.push(substrate);
        substrates.len() - 1
    }

    pub fn len(&self) -> usize {
        self.substrates.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mode(&self) -> RecordingMode {
        if self.recording_on.load(Ordering::Acquire) {
            RecordingMode::On
        } else {
            RecordingMode::Off
        }
    }

    /// Legal only outside any parallel region; enforcing that is the
    /// caller's (the adapter's) responsibility, not this manager's.
    pub fn enable_recording(&self) {
        self.recording_on.store(true, Ordering::Release);
    }

    pub fn disable_recording(&self) {
        self.recording_on.store(false, Ordering::Release);
    }

    fn for_each_active(&self, f: impl Fn(&dyn Substrate)) {
        let recording_on = self.recording_on.load(Ordering::Acquire);
        for substrate in self.substrates.read().unwrap().iter() {
            if recording_on || substrate.receives_while_recording_off() {
                f(substrate.as_ref());
            }
        }
    }

    pub fn dispatch_new_location(&self, location: LocationId) {
        self.for_each_active(|s| s.on_new_location(location));
    }

    pub fn dispatch_activate(&self, location: LocationId) {
        self.for_each_active(|s| s.on_activate(location));
    }

    pub fn dispatch_enter_region(&self, location: LocationId, region: RegionHandle, timestamp: u64) {
        self.for_each_active(|s| s.on_enter_region(location, region, timestamp));
    }

    pub fn dispatch_exit_region(&self, location: LocationId, region: RegionHandle, timestamp: u64) {
        self.for_each_active(|s| s.on_exit_region(location, region, timestamp));
    }

    pub fn dispatch_sample(&self, location: LocationId, timestamp: u64) {
        self.for_each_active(|s| s.on_sample(location, timestamp));
    }

    pub fn dispatch_metric(&self, location: LocationId, metric: MetricHandle, value: MetricValue, timestamp: u64) {
        self.for_each_active(|s| s.on_metric(location, metric, value, timestamp));
    }

    /// Runs `f` against a registered substrate downcast to its concrete
    /// type, for callers (tests, `scorep-info`) that registered a substrate
    /// and need to read its accumulated state back out.
    pub fn inspect<T: Substrate, R>(&self, slot: usize, f: impl FnOnce(&T) -> R) -> Option<R> {
        let substrates = self.substrates.read().unwrap();
        substrates.get(slot)?.as_any().downcast_ref::<T>().map(f)
    }
}

impl Default for SubstrateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::profile::ProfileSubstrate;
    use crate::substrate::trace::TraceSubstrate;
    use scorep_defs::Handle;

    fn region(n: u32) -> RegionHandle {
        Handle::from_index((n - 1) as usize)
    }

    #[test]
    fn recording_off_still_reaches_the_profile_substrate_but_not_trace() {
        let manager = SubstrateManager::new();
        manager.register(Box::new(TraceSubstrate::new()));
        let profile_slot = manager.register(Box::new(ProfileSubstrate::new()));
        manager.disable_recording();

        manager.dispatch_enter_region(LocationId(0), region(1), 100);

        let substrates = manager.substrates.read().unwrap();
        let profile = substrates[profile_slot]
            .as_any()
            .downcast_ref::<ProfileSubstrate>()
            .expect("profile substrate");
        assert_eq!(profile.call_count(region(1)), 1);
    }

    #[test]
    fn recording_on_reaches_every_registered_substrate() {
        let manager = SubstrateManager::new();
        manager.register(Box::new(TraceSubstrate::new()));
        manager.dispatch_enter_region(LocationId(0), region(1), 1);
        manager.dispatch_exit_region(LocationId(0), region(1), 2);
        let substrates = manager.substrates.read().unwrap();
        let trace = substrates[0]
            .as_any()
            .downcast_ref::<TraceSubstrate>()
            .expect("trace substrate");
        assert_eq!(trace.events().len(), 2);
    }
}
