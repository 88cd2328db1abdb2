//! Minimal inter-process communication abstraction.
//!
//! The core depends on nothing but this closed set of collective calls;
//! concrete transports (MPI, SHMEM, a serial no-op) are external
//! collaborators that implement [`Ipc`]. Only the calls clock
//! synchronization and unification actually need are modeled: point-to-point
//! `send`/`recv` of a small fixed payload, and a MIN/MAX/SUM `reduce`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Min,
    Max,
    Sum,
}

/// Pure reduction math, factored out so it can be exercised without a real
/// multi-rank transport.
pub fn reduce_over(values: &[u64], op: ReduceOp) -> u64 {
    match op {
        ReduceOp::Min => values.iter().copied().min().unwrap_or(0),
        ReduceOp::Max => values.iter().copied().max().unwrap_or(0),
        ReduceOp::Sum => values.iter().copied().sum(),
    }
}

pub trait Ipc {
    fn rank(&self) -> i32;
    fn size(&self) -> i32;

    fn send_i32(&self, value: i32, dest: i32);
    fn recv_i32(&self, src: i32) -> i32;

    fn send_u64(&self, value: u64, dest: i32);
    fn recv_u64(&self, src: i32) -> u64;

    /// Reduces `value` across all ranks to `root`. Returns `None` on every
    /// rank other than `root` — the collective still completes everywhere,
    /// but only `root` gets a usable result, mirroring
    /// `SCOREP_Ipc_Reduce`'s single-buffer-on-root contract.
    fn reduce_u64(&self, value: u64, op: ReduceOp, root: i32) -> Option<u64>;
}

/// The single-rank stand-in used when no real IPC transport is compiled
/// in: a rank that is always both sender and receiver of itself, so every
/// send/recv/reduce collapses to a no-op or an identity.
pub struct SerialIpc;

impl Ipc for SerialIpc {
    fn rank(&self) -> i32 {
        0
    }

    fn size(&self) -> i32 {
        1
    }

    fn send_i32(&self, _value: i32, _dest: i32) {}

    fn recv_i32(&self, _src: i32) -> i32 {
        0
    }

    fn send_u64(&self, _value: u64, _dest: i32) {}

    fn recv_u64(&self, _src: i32) -> u64 {
        0
    }

    fn reduce_u64(&self, value: u64, _op: ReduceOp, _root: i32) -> Option<u64> {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_over_matches_the_documented_min_max_example() {
        assert_eq!(reduce_over(&[10, 5], ReduceOp::Min), 5);
        assert_eq!(reduce_over(&[100, 90], ReduceOp::Max), 100);
    }

    #[test]
    fn serial_ipc_is_a_single_rank_and_reduces_to_itself() {
        let ipc = SerialIpc;
        assert_eq!(ipc.size(), 1);
        assert_eq!(ipc.rank(), 0);
        assert_eq!(ipc.reduce_u64(42, ReduceOp::Sum, 0), Some(42));
    }
}
