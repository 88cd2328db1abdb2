use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicI16, Ordering};

use crate::sync::spin_mutex::SpinMutex;

/// Large enough that a writer can drive `pending` negative and readers can
/// tell a write is in flight from the sign bit alone.
const MAX_READERS: i16 = 1 << 14;

/// Writer-preferring reader-writer lock guarding a `T`, built from four
/// shared counters plus an outer mutex serializing writers:
///
/// - `pending`: net count of readers currently in the critical section,
///   or negative while a writer holds the lock.
/// - `departing`: readers a writer is still waiting to see leave.
/// - `release_n_readers` / `release_writer`: one-shot release signals CAS'd
///   down to zero by the side waiting on them.
///
/// In the absence of a writer, locking for read is just an atomic increment
/// and decrement; contention is only paid when a writer is active or
/// pending, via spinning CAS loops on the release counters. Every
/// `DefinitionTable<T, Kind>` embeds one of these to guard its records,
/// index, and unified links as a single unit: the hot path is a reader
/// lookup in the hash table, insertion takes the writer lock.
pub struct RwLock<T> {
    pending: AtomicI16,
    departing: AtomicI16,
    release_n_readers: AtomicI16,
    release_writer: AtomicI16,
    writer_mutex: SpinMutex,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is only ever granted through a `ReadGuard`/
// `WriteGuard` produced by `read`/`write`, which enforce the same aliasing
// rules as `std::sync::RwLock`: concurrent readers hand out `&T` to
// multiple threads at once, so `Sync` additionally requires `T: Sync`.
unsafe impl<T: Send> Send for RwLock<T> {}
unsafe impl<T: Send + Sync> Sync for RwLock<T> {}

impl<T> RwLock<T> {
    pub const fn new(value: T) -> Self {
        RwLock {
            pending: AtomicI16::new(0),
            departing: AtomicI16::new(0),
            release_n_readers: AtomicI16::new(0),
            release_writer: AtomicI16::new(0),
            writer_mutex: SpinMutex::new(),
            data: UnsafeCell::new(value),
        }
    }

    pub fn read(&self) -> ReadGuard<'_, T> {
        let pending = self.pending.fetch_add(1, Ordering::SeqCst) + 1;
        if pending < 0 {
            loop {
                std::hint::spin_loop();
                let release = self.release_n_readers.load(Ordering::Relaxed);
                if release == 0 {
                    continue;
                }
                if self
                    .release_n_readers
                    .compare_exchange_weak(
                        release,
                        release - 1,
                        Ordering::AcqRel,
                        Ordering::Relaxed,
                    )
                    .is_ok()
                {
                    break;
                }
            }
        }
        ReadGuard { lock: self }
    }

    fn read_unlock(&self) {
        let pending = self.pending.fetch_add(-1, Ordering::SeqCst) - 1;
        if pending < 0 {
            let departing = self.departing.fetch_add(-1, Ordering::SeqCst) - 1;
            if departing == 0 {
                let swapped = self.release_writer.swap(1, Ordering::SeqCst);
                debug_assert_eq!(swapped, 0);
            }
        }
    }

    pub fn write(&self) -> WriteGuard<'_, T> {
        self.writer_mutex.lock();
        let pending = self.pending.fetch_add(-MAX_READERS, Ordering::SeqCst) + MAX_READERS;
        if pending != 0 {
            let departing = self.departing.fetch_add(pending, Ordering::SeqCst) + pending;
            if departing != 0 {
                loop {
                    std::hint::spin_loop();
                    let release = self.release_writer.load(Ordering::Relaxed);
                    if release == 0 {
                        continue;
                    }
                    if self
                        .release_writer
                        .compare_exchange_weak(
                            release,
                            release - 1,
                            Ordering::AcqRel,
                            Ordering::Relaxed,
                        )
                        .is_ok()
                    {
                        break;
                    }
                }
            }
        }
        WriteGuard { lock: self }
    }

    fn write_unlock(&self) {
        let pending = self.pending.fetch_add(MAX_READERS, Ordering::SeqCst) + MAX_READERS;
        if pending > 0 {
            let swapped = self.release_n_readers.swap(pending, Ordering::SeqCst);
            debug_assert_eq!(swapped, 0);
        }
        self.writer_mutex.unlock();
    }
}

impl<T> fmt::Debug for RwLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RwLock").finish_non_exhaustive()
    }
}

pub struct ReadGuard<'a, T> {
    lock: &'a RwLock<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: holding a `ReadGuard` means no `WriteGuard` is live.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.read_unlock();
    }
}

pub struct WriteGuard<'a, T> {
    lock: &'a RwLock<T>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: holding a `WriteGuard` means it is the sole live guard.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: holding a `WriteGuard` means it is the sole live guard.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.write_unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn readers_proceed_concurrently_without_a_writer() {
        let lock = RwLock::new(0u64);
        let g1 = lock.read();
        let g2 = lock.read();
        assert_eq!(*g1, 0);
        assert_eq!(*g2, 0);
    }

    #[test]
    fn writer_excludes_readers_and_other_writers() {
        let lock = Arc::new(RwLock::new(0u64));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let lock = lock.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    let mut guard = lock.write();
                    *guard += 1;
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*lock.read(), 2000);
    }

    #[test]
    fn mixed_readers_and_writer_eventually_make_progress() {
        let lock = Arc::new(RwLock::new(0u64));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let lock = lock.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..200 {
                    let _g = lock.read();
                }
            }));
        }
        let writer_lock = lock.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                *writer_lock.write() += 1;
            }
        }));
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*lock.read(), 50);
    }
}
