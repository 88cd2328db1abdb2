//! Call-site fingerprint table.
//!
//! A fixed-size, never-resized hash table pairing an adapter-chosen
//! identifier (e.g. an accelerator kernel-launch id) with the region-stack
//! hash captured at the moment of the call. The bucket count is a compile-
//! time power of two; collisions chain within a bucket rather than
//! triggering a resize, so the table never reallocates on the hot insert
//! path.

use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use rustc_hash::FxHasher;

const BUCKET_EXPONENT: u32 = 9;
const NUM_BUCKETS: usize = 1 << BUCKET_EXPONENT;

fn bucket_index<K: Hash>(key: &K) -> usize {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    (hasher.finish() as usize) & (NUM_BUCKETS - 1)
}

pub struct CallsiteTable<K> {
    buckets: Vec<Mutex<Vec<(K, u32)>>>,
}

impl<K: Hash + Eq + Copy> CallsiteTable<K> {
    pub fn new() -> Self {
        CallsiteTable {
            buckets: (0..NUM_BUCKETS).map(|_| Mutex::new(Vec::new())).collect(),
        }
    }

    /// Returns the existing value for `key`, or inserts `value` and returns
    /// it. Never resizes; a bucket may grow arbitrarily long under
    /// pathological hash collisions, same as the fixed-exponent table it
    /// generalizes.
    pub fn get_and_insert(&self, key: K, value: u32) -> u32 {
        let mut bucket = self.buckets[bucket_index(&key)].lock().unwrap();
        if let Some((_, existing)) = bucket.iter().find(|(k, _)| *k == key) {
            return *existing;
        }
        bucket.push((key, value));
        value
    }

    pub fn get_and_remove(&self, key: K) -> Option<u32> {
        let mut bucket = self.buckets[bucket_index(&key)].lock().unwrap();
        let pos = bucket.iter().position(|(k, _)| *k == key)?;
        Some(bucket.swap_remove(pos).1)
    }
}

impl<K: Hash + Eq + Copy> Default for CallsiteTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_remove_pairs_a_launch_with_its_completion() {
        let table: CallsiteTable<u64> = CallsiteTable::new();
        let hash = table.get_and_insert(42, 0xdead_beef);
        assert_eq!(hash, 0xdead_beef);
        assert_eq!(table.get_and_insert(42, 0), 0xdead_beef);
        assert_eq!(table.get_and_remove(42), Some(0xdead_beef));
        assert_eq!(table.get_and_remove(42), None);
    }

    #[test]
    fn distinct_keys_do_not_collide_in_value() {
        let table: CallsiteTable<u64> = CallsiteTable::new();
        table.get_and_insert(1, 111);
        table.get_and_insert(2, 222);
        assert_eq!(table.get_and_insert(1, 0), 111);
        assert_eq!(table.get_and_insert(2, 0), 222);
    }
}
