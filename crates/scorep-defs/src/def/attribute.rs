use crate::def::string::StringHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Int64,
    Uint64,
    Double,
    String,
}

pub enum AttributeKind {}
pub type AttributeHandle = Handle<AttributeKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: StringHandle,
    pub attribute_type: AttributeType,
}

pub type AttributeTable = DefinitionTable<Attribute, AttributeKind>;
