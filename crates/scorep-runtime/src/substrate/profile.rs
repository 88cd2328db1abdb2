//! In-memory profile substrate.
//!
//! Aggregates per-region call counts and inclusive time into a plain map
//! instead of writing a CUBE `.cubex` archive — the byte-level profile
//! format is an external collaborator. Opts into `receives_while_recording_off`
//! so pausing tracing (`RECORDING_OFF`) never leaves a gap in the profile.

use std::sync::Mutex;

use scorep_defs::fast_hash_map::FastHashMap;
use scorep_defs::RegionHandle;

use crate::location::{LocationId, MetricValue};
use crate::substrate::Substrate;

#[derive(Debug, Default, Clone)]
struct RegionStats {
    call_count: u64,
    inclusive_ticks: u64,
    open_enters: Vec<u64>,
}

pub struct ProfileSubstrate {
    stats: Mutex<FastHashMap<RegionHandle, RegionStats>>,
}

impl ProfileSubstrate {
    pub fn new() -> Self {
        ProfileSubstrate {
            stats: Mutex::new(FastHashMap::default()),
        }
    }

    pub fn call_count(&self, region: RegionHandle) -> u64 {
        self.stats
            .lock()
            .unwrap()
            .get(&region)
            .map(|s| s.call_count)
            .unwrap_or(0)
    }

    pub fn inclusive_ticks(&self, region: RegionHandle) -> u64 {
        self.stats
            .lock()
            .unwrap()
            .get(&region)
            .map(|s| s.inclusive_ticks)
            .unwrap_or(0)
    }
}

impl Default for ProfileSubstrate {
    fn default() -> Self {
        Self::new()
    }
}

impl Substrate for ProfileSubstrate {
    fn name(&self) -> &str {
        "profile"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn receives_while_recording_off(&self) -> bool {
        true
    }

    fn on_enter_region(&self, _location: LocationId, region: RegionHandle, timestamp: u64) {
        let mut stats = self.stats.lock().unwrap();
        let entry = stats.entry(region).or_default();
        entry.call_count += 1;
        entry.open_enters.push(timestamp);
    }

    fn on_exit_region(&self, _location: LocationId, region: RegionHandle, timestamp: u64) {
        let mut stats = self.stats.lock().unwrap();
        if let Some(entry) = stats.get_mut(&region) {
            if let Some(start) = entry.open_enters.pop() {
                entry.inclusive_ticks += timestamp.saturating_sub(start);
            }
        }
    }

    fn on_metric(&self, _location: LocationId, _metric: scorep_defs::MetricHandle, _value: MetricValue, _timestamp: u64) {
        // Metric aggregation into the profile's per-callpath metric vector
        // is owned by the (external) CUBE writer; the core only needs to
        // prove the event reaches an opted-in substrate.
    }
}
