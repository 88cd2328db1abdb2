//! Deduplicated definition registry and unification for a Score-P-style
//! measurement core.
//!
//! This crate is the data model shared by the measurement runtime
//! (`scorep-runtime`) and the inspection CLI (`scorep-info`): opaque
//! [`handle::Handle`]s, the generic [`table::DefinitionTable`] dedup engine,
//! one module per definition kind under [`def`], the aggregate
//! [`manager::DefinitionManager`], and the cross-process [`unification`]
//! pass that reduces many processes' local definitions to one unified set.

pub mod def;
pub mod fast_hash_map;
pub mod handle;
pub mod manager;
pub mod sync;
pub mod table;
pub mod unification;

pub use def::attribute::{Attribute, AttributeHandle, AttributeTable, AttributeType};
pub use def::calling_context::{CallingContext, CallingContextHandle, CallingContextTable};
pub use def::group::{
    Comm, CommHandle, CommTable, Group, GroupHandle, GroupKind, GroupTable, RmaWin, RmaWinHandle,
    RmaWinTable,
};
pub use def::interrupt_generator::{
    InterruptGenerator, InterruptGeneratorHandle, InterruptGeneratorMode, InterruptGeneratorTable,
};
pub use def::location::{Location, LocationHandle, LocationTable, LocationType};
pub use def::location_group::{
    LocationGroup, LocationGroupHandle, LocationGroupTable, LocationGroupType,
};
pub use def::metric::{
    Metric, MetricBase, MetricHandle, MetricMode, MetricOccurrence, MetricTable, MetricValueType,
    SamplingSet, SamplingSetHandle, SamplingSetTable,
};
pub use def::parameter::{Parameter, ParameterHandle, ParameterTable, ParameterType};
pub use def::region::{Paradigm, Region, RegionFlags, RegionHandle, RegionRole, RegionTable};
pub use def::source_file::{SourceFile, SourceFileHandle, SourceFileTable};
pub use def::string::{StringHandle, StringTable};
pub use def::system_tree::{
    SystemTreeDomain, SystemTreeNode, SystemTreeNodeHandle, SystemTreeTable,
};
pub use handle::Handle;
pub use manager::DefinitionManager;
pub use unification::{unify, unify_all};
