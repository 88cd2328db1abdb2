//! Re-entrancy and phase gate.
//!
//! Every adapter entry point goes through [`Gate::enter`]. The gate costs
//! nothing when idle: it's a thread-local counter, not a resource, and the
//! only cross-thread state is the phase variable written once by the
//! lifecycle coordinator and read everywhere else.

use std::cell::Cell;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Pre = 0,
    Within = 1,
    Post = 2,
}

impl Phase {
    fn from_u8(v: u8) -> Phase {
        match v {
            0 => Phase::Pre,
            1 => Phase::Within,
            _ => Phase::Post,
        }
    }
}

/// Process-wide phase variable. Written once per transition by the
/// lifecycle coordinator, read by every thread on every event.
pub struct PhaseVar(AtomicU8);

impl PhaseVar {
    pub const fn new() -> Self {
        PhaseVar(AtomicU8::new(Phase::Pre as u8))
    }

    pub fn get(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, phase: Phase) {
        self.0.store(phase as u8, Ordering::Release);
    }
}

impl Default for PhaseVar {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static IN_MEASUREMENT: Cell<u32> = const { Cell::new(0) };
    /// Distinct from `IN_MEASUREMENT`: set only around signal handlers
    /// delivering asynchronous samples, so the async event path can avoid
    /// any blocking allocation or lock acquisition that a signalled thread
    /// might already hold.
    static IN_SIGNAL_CONTEXT: Cell<bool> = const { Cell::new(false) };
}

/// RAII guard produced by [`Gate::enter`]. Drop performs the matching
/// post-decrement unconditionally, so early returns and panics inside an
/// adapter-wrapped call still leave the counter balanced.
pub struct EnterGuard {
    pre_value: u32,
}

impl EnterGuard {
    /// The counter's value *before* this entry incremented it. Non-zero
    /// means this call originated inside already-active measurement code
    /// (e.g. a wrapped `malloc` called from inside another wrapper) and
    /// must suppress event generation.
    pub fn is_nested(&self) -> bool {
        self.pre_value != 0
    }
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        IN_MEASUREMENT.with(|c| c.set(c.get() - 1));
    }
}

pub struct Gate;

impl Gate {
    pub fn enter() -> EnterGuard {
        let pre_value = IN_MEASUREMENT.with(|c| {
            let v = c.get();
            c.set(v + 1);
            v
        });
        EnterGuard { pre_value }
    }

    pub fn in_signal_context() -> bool {
        IN_SIGNAL_CONTEXT.with(Cell::get)
    }

    pub fn set_signal_context(value: bool) {
        IN_SIGNAL_CONTEXT.with(|c| c.set(value));
    }
}

/// Zeroes the re-entrancy counter for the duration of a call into the
/// library an adapter wraps, so nested wrapped calls re-arm, then restores
/// the saved value on drop.
pub struct WrappedRegionGuard {
    saved: u32,
}

impl WrappedRegionGuard {
    pub fn new() -> Self {
        let saved = IN_MEASUREMENT.with(|c| {
            let v = c.get();
            c.set(0);
            v
        });
        WrappedRegionGuard { saved }
    }
}

impl Default for WrappedRegionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WrappedRegionGuard {
    fn drop(&mut self) {
        IN_MEASUREMENT.with(|c| c.set(self.saved));
    }
}

pub fn should_record(phase: &PhaseVar) -> bool {
    phase.get() == Phase::Within
}
