use crate::def::string::StringHandle;
use crate::def::system_tree::SystemTreeNodeHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

/// What kind of location group this is — a process, or a metric-only
/// group carrying accelerator/RMA-window style locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationGroupType {
    Process,
    Accelerator,
    MetricOnly,
}

pub enum LocationGroupKind {}
pub type LocationGroupHandle = Handle<LocationGroupKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationGroup {
    pub name: StringHandle,
    pub parent: SystemTreeNodeHandle,
    pub group_type: LocationGroupType,
    /// The location group that created this one, or `INVALID` for a root
    /// process group. Mirrors `SCOREP_DefineLocationGroup`'s `creatingLocation`
    /// parameter used for accelerator/offload groups spawned by a host thread.
    pub creating_location_group: LocationGroupHandle,
}

pub type LocationGroupTable = DefinitionTable<LocationGroup, LocationGroupKind>;
