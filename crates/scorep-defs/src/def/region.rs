use bitflags::bitflags;

use crate::def::source_file::SourceFileHandle;
use crate::def::string::StringHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

/// The instrumentation paradigm that produced a region.
/// Kept small and open-ended on purpose: new paradigms are additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paradigm {
    User,
    Compiler,
    Mpi,
    OpenMp,
    Pthread,
    Cuda,
    Unknown,
}

/// What a region represents, independent of which paradigm instrumented it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionRole {
    Function,
    Loop,
    Barrier,
    Critical,
    Atomic,
    Collective,
    PointToPoint,
    Wrapper,
    Artificial,
    Unknown,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct RegionFlags: u32 {
        /// Region is a dynamic (not statically known at instrumentation
        /// time) phase, e.g. a loop wrapped at runtime.
        const DYNAMIC  = 1 << 0;
        /// Region corresponds to a calling-context sampling artifact rather
        /// than an explicitly instrumented call site.
        const PHASE    = 1 << 1;
    }
}

pub enum RegionKind {}
pub type RegionHandle = Handle<RegionKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub name: StringHandle,
    pub canonical_name: StringHandle,
    pub description: StringHandle,
    pub file: SourceFileHandle,
    pub begin_line: u32,
    pub end_line: u32,
    pub paradigm: Paradigm,
    pub role: RegionRole,
    pub flags: RegionFlags,
}

pub type RegionTable = DefinitionTable<Region, RegionKind>;
