//! Page-chunked bump allocation.
//!
//! Two scopes exist per process: one `misc` arena shared process-wide and
//! one per-location arena owned exclusively by its CPU thread. Neither ever
//! frees an individual allocation; all memory for a scope is released at
//! once when the scope is dropped (`Finalize`). Retired scopes can be
//! returned to an [`ArenaPool`] and handed back out on the next
//! initialization instead of requesting fresh pages from the allocator.

use std::ptr::NonNull;
use std::sync::Mutex;

use bumpalo::Bump;

pub const DEFAULT_EVENT_CHUNK_BYTES: usize = 1 << 20; // 1 MiB
pub const DEFAULT_DEF_CHUNK_BYTES: usize = 4 << 20; // 4 MiB
const CACHE_LINE_BYTES: usize = 64;

/// One bump-allocation scope. Allocation never fails by panicking; it
/// returns `None` so callers can propagate `ErrorCode::MemAllocFailed`.
pub struct Arena {
    bump: Bump,
    chunk_size: usize,
}

impl Arena {
    pub fn new(chunk_size: usize) -> Self {
        Arena {
            bump: Bump::with_capacity(chunk_size),
            chunk_size,
        }
    }

    pub fn alloc(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let layout = std::alloc::Layout::from_size_align(size, align).ok()?;
        self.bump.try_alloc_layout(layout).ok()
    }

    pub fn alloc_cacheline(&self, size: usize) -> Option<NonNull<u8>> {
        self.alloc(size, CACHE_LINE_BYTES)
    }

    /// Requests at least one fresh chunk's worth of memory, rounding `size`
    /// up to the configured page size.
    pub fn alloc_page(&self, size: usize) -> Option<NonNull<u8>> {
        self.alloc(size.max(self.chunk_size), CACHE_LINE_BYTES)
    }

    pub fn bytes_allocated(&self) -> usize {
        self.bump.allocated_bytes()
    }

    fn reset(&mut self) {
        self.bump.reset();
    }
}

/// Pool of retired, reset arenas kept so a subsequent initialization can
/// reuse already-mapped pages instead of asking the OS for new ones.
pub struct ArenaPool {
    chunk_size: usize,
    free: Mutex<Vec<Arena>>,
}

impl ArenaPool {
    pub fn new(chunk_size: usize) -> Self {
        ArenaPool {
            chunk_size,
            free: Mutex::new(Vec::new()),
        }
    }

    pub fn acquire(&self) -> Arena {
        let popped = self.free.lock().unwrap().pop();
        popped.unwrap_or_else(|| Arena::new(self.chunk_size))
    }

    pub fn release(&self, mut arena: Arena) {
        arena.reset();
        self.free.lock().unwrap().push(arena);
    }

    pub fn free_count(&self) -> usize {
        self.free.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_non_overlapping_and_aligned() {
        let arena = Arena::new(DEFAULT_EVENT_CHUNK_BYTES);
        let a = arena.alloc(16, 8).unwrap();
        let b = arena.alloc(32, 16).unwrap();
        assert_eq!(b.as_ptr() as usize % 16, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn alloc_cacheline_is_64_byte_aligned() {
        let arena = Arena::new(DEFAULT_EVENT_CHUNK_BYTES);
        let p = arena.alloc_cacheline(8).unwrap();
        assert_eq!(p.as_ptr() as usize % 64, 0);
    }

    #[test]
    fn pool_reuses_a_released_arena_instead_of_allocating_fresh() {
        let pool = ArenaPool::new(DEFAULT_DEF_CHUNK_BYTES);
        let a = pool.acquire();
        assert_eq!(pool.free_count(), 0);
        pool.release(a);
        assert_eq!(pool.free_count(), 1);
        let _b = pool.acquire();
        assert_eq!(pool.free_count(), 0);
    }
}
