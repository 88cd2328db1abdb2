use crate::def::region::RegionHandle;
use crate::def::source_file::SourceFileHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

pub enum CallingContextKind {}
pub type CallingContextHandle = Handle<CallingContextKind>;

/// One node of a calling-context tree: a region activation plus an
/// optional more-precise source location, linked to its caller.
/// Parents are always inserted, and therefore unified, before their
/// children — the same ordering constraint as [`crate::def::group::Comm`]
/// and [`crate::def::system_tree::SystemTreeNode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallingContext {
    pub region: RegionHandle,
    pub source_file: SourceFileHandle,
    pub line: u32,
    pub parent: CallingContextHandle,
}

pub type CallingContextTable = DefinitionTable<CallingContext, CallingContextKind>;
