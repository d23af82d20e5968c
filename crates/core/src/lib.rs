// Auth Scheme Provider Generation
//
// This crate compiles declarative auth metadata (auth traits on a service and
// per-operation auth overrides) into a deterministic auth option provider.
//
// Key design decisions:
// - Model access goes through traits (Shape, ModelQuery); ServiceModel is the built-in snapshot
// - Scheme descriptors are registered explicitly at startup (SchemeRegistry, AuthSchemeIntegration)
// - Property values come from tagged source variants, each tolerating an absent trait
// - Ordered containers (IndexMap, Vec) everywhere the output order is observable
// - Divergence from the service default is a sequence comparison, never a set comparison
// - Emission goes through the CodeSink trait so the generator never formats files itself

// Identifiers and errors
pub mod error;
pub mod scheme_id;

// Model snapshot
pub mod model;

// Scheme descriptors
pub mod parameter;
pub mod property;
pub mod registry;
pub mod schemes;

// Resolution pipeline
pub mod procedure;
pub mod resolver;
pub mod synthesizer;

// Emission
pub mod config;
pub mod generator;
pub mod writer;

// Re-exports for convenience
pub use error::{AuthGenError, Result};
pub use scheme_id::SchemeId;

pub use model::{AuthTrait, ModelQuery, OperationShape, ServiceModel, ServiceShape, Shape};

pub use parameter::{collect_parameters, ParameterSource, SchemeParameter, OPERATION_PARAMETER};
pub use property::{OptionProperty, PropertyCategory, PropertySource, SourceFn};
pub use registry::{AuthScheme, AuthSchemeIntegration, SchemeRegistry, SchemeRegistryBuilder};
pub use schemes::BuiltinSchemes;

pub use procedure::{DecisionProcedure, DecisionProcedureBuilder, OperationBranch};
pub use resolver::{AuthSchemeMode, DivergentOperation, EffectiveSchemeResolver, EffectiveSchemeSet};
pub use synthesizer::{OptionSynthesizer, ResolvedOption};

pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use generator::{GenerationReport, HttpAuthSchemeProviderGenerator, OptionFactory};
pub use writer::{CodeSink, CodeWriter, Expression, Import};
