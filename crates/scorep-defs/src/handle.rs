use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::num::NonZeroU32;

use serde::ser::{Serialize, Serializer};

/// An opaque, non-zero, 32-bit definition identity.
///
/// `Handle<Kind>` dereferences to the same record for its whole lifetime
/// (definitions are create-only). Zero is reserved to mean "invalid"; it is
/// never returned by [`crate::manager::DefinitionTable::get_or_insert`].
/// A handle may later gain a `unified` counterpart in a different manager,
/// but the handle's own integer value never changes.
pub struct Handle<Kind> {
    raw: u32,
    _kind: PhantomData<fn() -> Kind>,
}

impl<Kind> Handle<Kind> {
    /// The invalid handle. Used for optional parent links (e.g. the system
    /// tree root has no parent) and as the default value before unification
    /// has run.
    pub const INVALID: Self = Handle {
        raw: 0,
        _kind: PhantomData,
    };

    /// Builds a handle directly from a zero-based index. Production code
    /// reaches handles only through `DefinitionTable::get_or_insert`; this
    /// is `pub` so tests elsewhere in the workspace can construct synthetic
    /// handles without standing up a whole table.
    pub fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index + 1).expect("definition table overflowed u32 handle space");
        Handle {
            raw,
            _kind: PhantomData,
        }
    }

    pub fn is_valid(self) -> bool {
        self.raw != 0
    }

    /// Zero-based index into the owning table's record vector.
    pub(crate) fn index(self) -> Option<usize> {
        NonZeroU32::new(self.raw).map(|n| (n.get() - 1) as usize)
    }

    pub fn as_u32(self) -> u32 {
        self.raw
    }
}

impl<Kind> Default for Handle<Kind> {
    fn default() -> Self {
        Self::INVALID
    }
}

impl<Kind> Clone for Handle<Kind> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<Kind> Copy for Handle<Kind> {}

impl<Kind> PartialEq for Handle<Kind> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl<Kind> Eq for Handle<Kind> {}

impl<Kind> Hash for Handle<Kind> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<Kind> PartialOrd for Handle<Kind> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<Kind> Ord for Handle<Kind> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<Kind> fmt::Debug for Handle<Kind> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Handle({})", self.raw)
        } else {
            write!(f, "Handle(invalid)")
        }
    }
}

impl<Kind> Serialize for Handle<Kind> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum TestKind {}
    type TestHandle = Handle<TestKind>;

    #[test]
    fn invalid_by_default() {
        assert!(!TestHandle::default().is_valid());
        assert_eq!(TestHandle::INVALID, TestHandle::default());
    }

    #[test]
    fn from_index_is_one_based() {
        let h = TestHandle::from_index(0);
        assert!(h.is_valid());
        assert_eq!(h.index(), Some(0));
        assert_eq!(h.as_u32(), 1);
    }
}
