use crate::def::string::StringHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Int64,
    Uint64,
    String,
}

pub enum ParameterKind {}
pub type ParameterHandle = Handle<ParameterKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: StringHandle,
    pub parameter_type: ParameterType,
}

pub type ParameterTable = DefinitionTable<Parameter, ParameterKind>;
