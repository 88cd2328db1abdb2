use crate::def::location::LocationHandle;
use crate::def::string::StringHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricValueType {
    Int64,
    Uint64,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricOccurrence {
    Synchronous,
    SynchronousStrict,
    Asynchronous,
}

/// Scaling base for a metric's or interrupt generator's value: `base^exponent`
/// is the factor applied to the raw recorded number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricBase {
    Decimal,
    Binary,
}

/// How successive samples of a metric relate to one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricMode {
    Accumulated,
    Absolute,
    Relative,
}

pub enum MetricKind {}
pub type MetricHandle = Handle<MetricKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Metric {
    pub name: StringHandle,
    pub description: StringHandle,
    pub unit: StringHandle,
    pub value_type: MetricValueType,
    pub occurrence: MetricOccurrence,
    pub base: MetricBase,
    pub exponent: i16,
    pub mode: MetricMode,
}

pub type MetricTable = DefinitionTable<Metric, MetricKind>;

/// A set of metrics sampled together at every reading. Scoped to a
/// location because dense per-sample metric sets are recorded
/// per source location, matching the per-location counter scope used
/// elsewhere in the measurement core.
pub enum SamplingSetKind {}
pub type SamplingSetHandle = Handle<SamplingSetKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SamplingSet {
    pub metrics: Vec<MetricHandle>,
    pub scope: LocationHandle,
}

pub type SamplingSetTable = DefinitionTable<SamplingSet, SamplingSetKind>;
