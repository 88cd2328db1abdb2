use std::fmt;
use std::hash::Hash;

use crate::fast_hash_map::FastHashMap;
use crate::handle::Handle;
use crate::sync::RwLock;

struct TableInner<T, Kind> {
    records: Vec<T>,
    unified: Vec<Handle<Kind>>,
    index: FastHashMap<T, Handle<Kind>>,
}

impl<T, Kind> Default for TableInner<T, Kind> {
    fn default() -> Self {
        TableInner {
            records: Vec::new(),
            unified: Vec::new(),
            index: FastHashMap::default(),
        }
    }
}

/// One definition kind's append-only catalog.
///
/// Both the local (per-process) definition manager and the unified
/// (post-unification) definition manager are built from one of these per
/// kind: a monotonic vector (handle = index + 1) plus a hash table keyed by
/// the record's own semantic tuple, so `get_or_insert`
/// is idempotent — two calls with equal attributes return the same handle.
///
/// State lives behind a single [`RwLock`], so a table can be shared as
/// `&DefinitionTable` and populated concurrently: the hot path is a reader
/// lookup in the hash table, and only a genuine insert takes the writer
/// lock.
///
/// `T` is the record type and doubles as the hash key; it must contain only
/// the attributes that participate in deduplication. Fields that mutate
/// after creation (e.g. a location's running event count) must not be part
/// of `T` — store them in a side vector indexed by `Handle<Kind>::index()`
/// instead, as `crate::location::LocationTable` does.
pub struct DefinitionTable<T, Kind> {
    inner: RwLock<TableInner<T, Kind>>,
}

impl<T, Kind> fmt::Debug for DefinitionTable<T, Kind> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionTable").finish_non_exhaustive()
    }
}

impl<T, Kind> Default for DefinitionTable<T, Kind> {
    fn default() -> Self {
        DefinitionTable {
            inner: RwLock::new(TableInner::default()),
        }
    }
}

impl<T: Eq + Hash + Clone, Kind> DefinitionTable<T, Kind> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `attrs` in the hash table; insert a new record if absent.
    /// Returns the handle and whether the record was newly created.
    ///
    /// Double-checked: a reader-lock lookup first, so the common "already
    /// defined" case never blocks on the writer lock; only a genuine miss
    /// re-checks under the writer lock before inserting, since a concurrent
    /// writer may have raced in the same record between the two checks.
    pub fn get_or_insert(&self, attrs: T) -> (Handle<Kind>, bool) {
        if let Some(handle) = self.inner.read().index.get(&attrs) {
            return (*handle, false);
        }
        let mut inner = self.inner.write();
        if let Some(handle) = inner.index.get(&attrs) {
            return (*handle, false);
        }
        let handle = Handle::from_index(inner.records.len());
        inner.records.push(attrs.clone());
        inner.unified.push(Handle::INVALID);
        inner.index.insert(attrs, handle);
        (handle, true)
    }

    pub fn get(&self, handle: Handle<Kind>) -> Option<T> {
        let index = handle.index()?;
        self.inner.read().records.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    /// The `unified` field of a local definition: `invalid` until
    /// unification runs, then stable forever.
    pub fn unified_of(&self, handle: Handle<Kind>) -> Handle<Kind> {
        match handle.index() {
            Some(i) => self
                .inner
                .read()
                .unified
                .get(i)
                .copied()
                .unwrap_or(Handle::INVALID),
            None => Handle::INVALID,
        }
    }

    pub fn set_unified(&self, local: Handle<Kind>, unified: Handle<Kind>) {
        if let Some(i) = local.index() {
            if let Some(slot) = self.inner.write().unified.get_mut(i) {
                *slot = unified;
            }
        }
    }

    /// Ordered snapshot of `(handle, record)`, used by unification and by
    /// substrates during write-out.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<Kind>, T)> {
        self.inner
            .read()
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (Handle::from_index(i), r.clone()))
            .collect::<Vec<_>>()
            .into_iter()
    }
}
