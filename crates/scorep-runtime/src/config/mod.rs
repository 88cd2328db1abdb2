pub mod registry;
pub mod value;

pub use registry::{ConfigRegistry, ConfigVar, ResolvedConfigVar};
pub use value::{ConfigType, ConfigValue, Vocabulary};
