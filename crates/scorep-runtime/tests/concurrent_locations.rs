//! Exercises the measurement core across real OS threads rather than the
//! single-threaded unit tests inside each module: concurrent location
//! activation must hand out distinct ids, and concurrent region enter/exit
//! dispatch must not lose or duplicate events.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use scorep_defs::{Paradigm, RegionFlags, RegionRole};
use scorep_runtime::clock_sync::SystemClock;
use scorep_runtime::location::LocationId;
use scorep_runtime::substrate::trace::TraceSubstrate;
use scorep_runtime::Measurement;

const THREAD_COUNT: usize = 8;
const ENTERS_PER_THREAD: usize = 50;

fn region_name(n: u32) -> &'static str {
    match n % 4 {
        0 => "region_a",
        1 => "region_b",
        2 => "region_c",
        _ => "region_d",
    }
}

#[test]
fn concurrent_threads_get_distinct_locations_and_every_event_is_dispatched() {
    let mut measurement = Measurement::new();
    measurement.initialize(None).unwrap();
    let trace_slot = measurement.substrates().register(Box::new(TraceSubstrate::new()));
    measurement.begin_measurement();
    let measurement = Arc::new(measurement);

    let (tx, rx) = bounded::<LocationId>(THREAD_COUNT);
    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|t| {
            let measurement = Arc::clone(&measurement);
            let tx = tx.clone();
            thread::spawn(move || {
                let clock = SystemClock::new();
                let id = measurement.activate_location(Paradigm::User, 0, t as u64);
                for i in 0..ENTERS_PER_THREAD {
                    let r = measurement.enter_region(
                        region_name(i as u32),
                        None,
                        1,
                        1,
                        Paradigm::User,
                        RegionRole::Function,
                        RegionFlags::empty(),
                        &clock,
                    );
                    measurement.exit_region(r, &clock);
                }
                tx.send(id).unwrap();
            })
        })
        .collect();
    drop(tx);

    for h in handles {
        h.join().unwrap();
    }

    let mut ids: Vec<LocationId> = rx.iter().collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), THREAD_COUNT, "every thread must get its own location id");

    let event_count = measurement
        .substrates()
        .inspect::<TraceSubstrate, _>(trace_slot, |t| t.events().len())
        .unwrap();
    assert_eq!(event_count, THREAD_COUNT * ENTERS_PER_THREAD * 2);
}
