use crate::def::location_group::LocationGroupHandle;
use crate::def::string::StringHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

/// The resource a location represents. CPU threads are the common case;
/// the others cover accelerator streams and synthetic metric-only
/// locations created for MPI rank-to-location bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationType {
    Cpu,
    Gpu,
    Metric,
    GpuComputeQueue,
}

pub enum LocationKind {}
pub type LocationHandle = Handle<LocationKind>;

/// The immutable, deduplication-relevant part of a location definition.
///
/// A location's running event count and its OS thread binding are mutable
/// over the location's lifetime and therefore live outside this struct, in
/// `scorep_runtime::location::LocationState` — see the note on
/// [`crate::table::DefinitionTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub name: StringHandle,
    pub parent: LocationGroupHandle,
    pub location_type: LocationType,
    /// Global creation order, used to break ties when locations are
    /// otherwise indistinguishable (e.g. two unnamed CPU threads).
    pub sequence_number: u64,
}

pub type LocationTable = DefinitionTable<Location, LocationKind>;
