//! Testgen: Type-Directed Value Synthesis
//!
//! Produces default and random values for arbitrary types so test fixtures
//! can be built without hand-written data. A [`GeneratorRegistry`] resolves
//! a generator per raw type; metadata sources (constraints, type
//! declarations, explicit parameters) are folded into a parameter object
//! that narrows what the generator may produce.

pub mod composition;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod generators;
pub mod logging;
pub mod metadata;
pub mod params;
pub mod registry;
pub mod types;
pub mod value;

pub use config::{ConfigLoader, GeneratorsConfig};
pub use error::GenerationError;
pub use extract::{ExtractorRegistry, ParametersExtractor, ParametersSourceExtractor};
pub use generator::{
    priority, Executable, ExecutableGenerator, ExecutableKind, Generator,
    ParameterizableGenerator, Request, TargetedGenerator, DEFAULT_NULL_PROBABILITY,
};
pub use metadata::{
    Constraint, CustomSource, DeclaredConstraint, ExecutableId, MetadataCatalog,
    MetadataProvider, MetadataSource, SourceKind, TargetSite, groups, Group, DEFAULT_GROUP,
};
pub use params::{Capability, CapabilitySet, GenerationParameters, NumberBounds, SizeRange};
pub use registry::{GeneratorRegistry, RegistryBuilder};
pub use types::{RawType, TypeDescriptor};
pub use value::{EnumValue, ObjectValue, Value};
