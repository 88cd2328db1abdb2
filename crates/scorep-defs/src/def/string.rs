use crate::handle::Handle;
use crate::table::DefinitionTable;

/// Marker type for [`StringHandle`]. Strings are the base case of the
/// definition system: every other kind stores string handles, never raw
/// `String`s, so equality of attached names reduces to handle comparison.
pub enum StringKind {}

pub type StringHandle = Handle<StringKind>;

/// `String` is its own hash key here — there is no wrapper attribute
/// struct; interning goes directly into `Vec<String>` + `FastHashMap<String, _>`.
pub type StringTable = DefinitionTable<String, StringKind>;
