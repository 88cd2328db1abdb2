use std::sync::atomic::{AtomicBool, Ordering};

/// Test-and-test-and-set spin lock. Used as the outer mutex serializing
/// writers in [`crate::sync::RwLock`]: readers of the lock state spin on a
/// relaxed load before attempting the more expensive exchange, so an
/// already-held lock doesn't thrash the cache line with failed
/// compare-exchanges.
#[derive(Debug, Default)]
pub struct SpinMutex {
    locked: AtomicBool,
}

impl SpinMutex {
    pub const fn new() -> Self {
        SpinMutex {
            locked: AtomicBool::new(false),
        }
    }

    pub fn lock(&self) {
        loop {
            while self.locked.load(Ordering::Relaxed) {
                std::hint::spin_loop();
            }
            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                break;
            }
            std::hint::spin_loop();
        }
    }

    pub fn try_lock(&self) -> bool {
        if self.locked.load(Ordering::Relaxed) {
            return false;
        }
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    pub fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn mutual_exclusion_under_contention() {
        let mutex = Arc::new(SpinMutex::new());
        let counter = Arc::new(std::sync::atomic::AtomicU64::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let mutex = mutex.clone();
            let counter = counter.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    mutex.lock();
                    let v = counter.load(Ordering::Relaxed);
                    counter.store(v + 1, Ordering::Relaxed);
                    mutex.unlock();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(counter.load(Ordering::Relaxed), 8000);
    }

    #[test]
    fn try_lock_fails_while_held() {
        let mutex = SpinMutex::new();
        assert!(mutex.try_lock());
        assert!(!mutex.try_lock());
        mutex.unlock();
        assert!(mutex.try_lock());
    }
}
