use crate::def::string::StringHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

pub enum SourceFileKind {}
pub type SourceFileHandle = Handle<SourceFileKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    pub name: StringHandle,
}

pub type SourceFileTable = DefinitionTable<SourceFile, SourceFileKind>;
