use crate::def::attribute::AttributeTable;
use crate::def::calling_context::CallingContextTable;
use crate::def::group::{CommTable, GroupTable, RmaWinTable};
use crate::def::interrupt_generator::InterruptGeneratorTable;
use crate::def::location::LocationTable;
use crate::def::location_group::LocationGroupTable;
use crate::def::metric::{MetricTable, SamplingSetTable};
use crate::def::parameter::ParameterTable;
use crate::def::region::RegionTable;
use crate::def::source_file::SourceFileTable;
use crate::def::string::StringTable;
use crate::def::system_tree::SystemTreeTable;

/// The full set of definition catalogs for one side of unification — either
/// a single process's local definitions, or the one unified result. Both
/// sides use the exact same layout; which one a given `DefinitionManager`
/// represents is a matter of how it was built, not of its type.
#[derive(Debug, Default)]
pub struct DefinitionManager {
    pub strings: StringTable,
    pub system_tree: SystemTreeTable,
    pub location_groups: LocationGroupTable,
    pub locations: LocationTable,
    pub source_files: SourceFileTable,
    pub regions: RegionTable,
    pub groups: GroupTable,
    pub comms: CommTable,
    pub rma_wins: RmaWinTable,
    pub metrics: MetricTable,
    pub sampling_sets: SamplingSetTable,
    pub parameters: ParameterTable,
    pub attributes: AttributeTable,
    pub calling_contexts: CallingContextTable,
    pub interrupt_generators: InterruptGeneratorTable,
}

impl DefinitionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of definitions across every catalog, used by
    /// `scorep-info` and by tests that assert on overall registry growth.
    pub fn total_len(&self) -> usize {
        self.strings.len()
            + self.system_tree.len()
            + self.location_groups.len()
            + self.locations.len()
            + self.source_files.len()
            + self.regions.len()
            + self.groups.len()
            + self.comms.len()
            + self.rma_wins.len()
            + self.metrics.len()
            + self.sampling_sets.len()
            + self.parameters.len()
            + self.attributes.len()
            + self.calling_contexts.len()
            + self.interrupt_generators.len()
    }
}
