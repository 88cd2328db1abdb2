use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use rustc_hash::FxHasher;

/// A `HashMap` using the non-cryptographic `FxHasher`. Every hash table in
/// this crate that isn't one of the dedicated fast-hashtable specializations
/// (`scorep_runtime::callsite`) goes through this alias.
pub type FastHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;
