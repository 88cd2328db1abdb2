use crate::def::metric::MetricBase;
use crate::def::string::StringHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterruptGeneratorMode {
    Time,
    Count,
}

pub enum InterruptGeneratorKind {}
pub type InterruptGeneratorHandle = Handle<InterruptGeneratorKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterruptGenerator {
    pub name: StringHandle,
    pub mode: InterruptGeneratorMode,
    pub base: MetricBase,
    pub exponent: i16,
    /// Sampling period, scaled by `base^exponent`, in the generator's own
    /// unit (nanoseconds for `Time`, events for `Count`).
    pub period: u64,
}

pub type InterruptGeneratorTable = DefinitionTable<InterruptGenerator, InterruptGeneratorKind>;
