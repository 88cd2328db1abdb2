//! In-memory trace substrate.
//!
//! Records events into a plain `Vec` instead of encoding OTF2 bytes — the
//! byte-level trace format is an external collaborator this core never
//! implements. A real trace substrate would flush this buffer to
//! `<experiment-dir>/traces/` per location.

use std::sync::Mutex;

use scorep_defs::{MetricHandle, RegionHandle};

use crate::location::{LocationId, MetricValue};
use crate::substrate::Substrate;

#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    NewLocation(LocationId),
    Activate(LocationId),
    EnterRegion { location: LocationId, region: RegionHandle, timestamp: u64 },
    ExitRegion { location: LocationId, region: RegionHandle, timestamp: u64 },
    Sample { location: LocationId, timestamp: u64 },
    Metric { location: LocationId, metric: MetricHandle, value: MetricValue, timestamp: u64 },
}

pub struct TraceSubstrate {
    events: Mutex<Vec<TraceEvent>>,
}

impl TraceSubstrate {
    pub fn new() -> Self {
        TraceSubstrate {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: TraceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Default for TraceSubstrate {
    fn default() -> Self {
        Self::new()
    }
}

impl Substrate for TraceSubstrate {
    fn name(&self) -> &str {
        "trace"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn on_new_location(&self, location: LocationId) {
        self.push(TraceEvent::NewLocation(location));
    }

    fn on_activate(&self, location: LocationId) {
        self.push(TraceEvent::Activate(location));
    }

    fn on_enter_region(&self, location: LocationId, region: RegionHandle, timestamp: u64) {
        self.push(TraceEvent::EnterRegion { location, region, timestamp });
    }

    fn on_exit_region(&self, location: LocationId, region: RegionHandle, timestamp: u64) {
        self.push(TraceEvent::ExitRegion { location, region, timestamp });
    }

    fn on_sample(&self, location: LocationId, timestamp: u64) {
        self.push(TraceEvent::Sample { location, timestamp });
    }

    fn on_metric(&self, location: LocationId, metric: MetricHandle, value: MetricValue, timestamp: u64) {
        self.push(TraceEvent::Metric { location, metric, value, timestamp });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorep_defs::Handle;

    #[test]
    fn events_are_recorded_in_arrival_order() {
        let trace = TraceSubstrate::new();
        let region = Handle::from_index(0);
        trace.on_enter_region(LocationId(0), region, 10);
        trace.on_exit_region(LocationId(0), region, 20);
        let events = trace.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            TraceEvent::EnterRegion { location: LocationId(0), region, timestamp: 10 }
        );
    }
}
