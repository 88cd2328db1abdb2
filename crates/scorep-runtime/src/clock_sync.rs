//! Clock synchronization.
//!
//! Rank 0 pings every other rank `N_PINGPONGS` times, keeps the round trip
//! with the smallest latency, and tells the worker the midpoint timestamp
//! plus which round trip was chosen; the worker derives its offset to
//! rank 0 from that. `stddev` is recorded but never computed — see the
//! reserved field note on [`ClockOffset`].

use crate::ipc::{Ipc, ReduceOp};

const N_PINGPONGS: usize = 10;

pub trait Clock {
    fn ticks(&self) -> u64;
}

/// Wall-clock ticks since an arbitrary epoch fixed at construction.
pub struct SystemClock {
    start: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn ticks(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

/// `(offset_time, offset, stddev)`: the local tick count at which the
/// offset was computed, the signed offset to rank 0's clock, and a
/// standard-deviation field that is reserved for future use and always
/// `0.0` — no studied implementation ever computes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockOffset {
    pub offset_time: u64,
    pub offset: i64,
    pub stddev: f64,
}

/// Picks the round trip with the smallest `recv - send` latency and
/// returns `(send[idx] + latency/2, idx)`, exactly the arithmetic
/// `synchronize_with_worker` performs once the raw timestamps are in hand.
fn pick_best_round_trip(send: &[u64; N_PINGPONGS], recv: &[u64; N_PINGPONGS]) -> (u64, usize) {
    let mut best_latency = u64::MAX;
    let mut best_index = 0;
    for i in 0..N_PINGPONGS {
        let latency = recv[i] - send[i];
        if latency < best_latency {
            best_latency = latency;
            best_index = i;
        }
    }
    (send[best_index] + best_latency / 2, best_index)
}

fn master_side<I: Ipc, C: Clock>(ipc: &I, clock: &C, worker: i32) {
    let mut send_time = [0u64; N_PINGPONGS];
    let mut recv_time = [0u64; N_PINGPONGS];
    for i in 0..N_PINGPONGS {
        send_time[i] = clock.ticks();
        ipc.send_i32(0, worker);
        ipc.recv_i32(worker);
        recv_time[i] = clock.ticks();
    }
    let (sync_time, min_index) = pick_best_round_trip(&send_time, &recv_time);
    ipc.send_u64(sync_time, worker);
    ipc.send_i32(min_index as i32, worker);
}

fn worker_side<I: Ipc, C: Clock>(ipc: &I, clock: &C, master: i32) -> ClockOffset {
    let mut worker_time = [0u64; N_PINGPONGS];
    for slot in worker_time.iter_mut() {
        ipc.recv_i32(master);
        *slot = clock.ticks();
        ipc.send_i32(0, master);
    }
    let sync_time = ipc.recv_u64(master);
    let min_index = ipc.recv_i32(master) as usize;

    let offset_time = worker_time[min_index];
    let offset = sync_time as i64 - offset_time as i64;
    ClockOffset {
        offset_time,
        offset,
        stddev: 0.0,
    }
}

/// `SCOREP_SynchronizeClocks`. `clock_is_global` and `tracing_enabled` are
/// the timer-already-global and `SCOREP_ENABLE_TRACING` shortcuts: either
/// one skips the collective entirely and records a zero offset at the
/// current tick.
pub fn synchronize_clocks<I: Ipc, C: Clock>(
    ipc: &I,
    clock: &C,
    clock_is_global: bool,
    tracing_enabled: bool,
) -> ClockOffset {
    if clock_is_global || !tracing_enabled {
        return ClockOffset {
            offset_time: clock.ticks(),
            offset: 0,
            stddev: 0.0,
        };
    }

    let rank = ipc.rank();
    let size = ipc.size();

    if rank == 0 {
        for worker in 1..size {
            master_side(ipc, clock, worker);
        }
        ClockOffset {
            offset_time: clock.ticks(),
            offset: 0,
            stddev: 0.0,
        }
    } else {
        worker_side(ipc, clock, 0)
    }
}

/// `SCOREP_GetGlobalEpoch`: reduces every rank's local `(begin, end)` pair
/// to rank 0 via MIN/MAX. Returns `None` on every non-root rank.
pub fn get_global_epoch<I: Ipc>(ipc: &I, local_begin: u64, local_end: u64) -> Option<(u64, u64)> {
    let begin = ipc.reduce_u64(local_begin, ReduceOp::Min, 0);
    let end = ipc.reduce_u64(local_end, ReduceOp::Max, 0);
    if ipc.rank() != 0 {
        return None;
    }
    let (begin, end) = (begin?, end?);
    assert!(end > begin, "global epoch end must be after begin");
    Some((begin, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::SerialIpc;

    #[test]
    fn best_round_trip_picks_the_smallest_latency() {
        let send = [0u64; N_PINGPONGS];
        let recv = [100, 80, 80, 60, 80, 80, 80, 80, 80, 80];
        let (sync_time, index) = pick_best_round_trip(&send, &recv);
        assert_eq!(index, 3);
        assert_eq!(sync_time, 30);
    }

    #[test]
    fn already_global_clock_skips_the_collective() {
        let ipc = SerialIpc;
        let clock = SystemClock::new();
        let offset = synchronize_clocks(&ipc, &clock, true, true);
        assert_eq!(offset.offset, 0);
        assert_eq!(offset.stddev, 0.0);
    }

    #[test]
    fn single_rank_synchronization_is_a_trivial_zero_offset() {
        let ipc = SerialIpc;
        let clock = SystemClock::new();
        let offset = synchronize_clocks(&ipc, &clock, false, true);
        assert_eq!(offset.offset, 0);
    }

    #[test]
    fn global_epoch_reduces_begin_by_min_and_end_by_max() {
        // A rank-0-only reduction check: SerialIpc's reduce_u64 is an
        // identity, so exercise the MIN/MAX arithmetic directly the way
        // `get_global_epoch` composes it.
        use crate::ipc::{reduce_over, ReduceOp};
        assert_eq!(reduce_over(&[10, 5], ReduceOp::Min), 5);
        assert_eq!(reduce_over(&[100, 90], ReduceOp::Max), 100);

        let ipc = SerialIpc;
        let (begin, end) = get_global_epoch(&ipc, 5, 100).unwrap();
        assert_eq!((begin, end), (5, 100));
    }
}
