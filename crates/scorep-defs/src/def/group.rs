use crate::def::location::LocationHandle;
use crate::def::string::StringHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

/// What a [`Group`] enumerates. `Comm`s and `RmaWin`s are themselves backed
/// by a locations group plus a self-reference set, so this type is reused
/// by both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Locations,
    Regions,
    Metric,
}

pub enum GroupHandleKind {}
pub type GroupHandle = Handle<GroupHandleKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Group {
    pub name: StringHandle,
    pub kind: GroupKind,
    pub members: Vec<LocationHandle>,
}

pub type GroupTable = DefinitionTable<Group, GroupHandleKind>;

pub enum CommKind {}
pub type CommHandle = Handle<CommKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comm {
    pub name: StringHandle,
    pub group: GroupHandle,
    /// Parent communicator, or `INVALID` for a world-spanning root comm.
    /// Mirrors the original's requirement that parents are always defined
    /// (and thus unified) before their children.
    pub parent: CommHandle,
}

pub type CommTable = DefinitionTable<Comm, CommKind>;

pub enum RmaWinKind {}
pub type RmaWinHandle = Handle<RmaWinKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RmaWin {
    pub name: StringHandle,
    pub comm: CommHandle,
}

pub type RmaWinTable = DefinitionTable<RmaWin, RmaWinKind>;
