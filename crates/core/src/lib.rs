/// Contract model, naming, type mapping and context building for client generation
pub mod abi;
pub mod arc56;
pub mod call_config;
pub mod config;
pub mod context;
pub mod naming;
pub mod type_mapping;

pub use abi::{split_tuple, AbiParseError, AbiType};
pub use arc56::Arc56Contract;
pub use call_config::{analyze_bare, analyze_method, has_create_method, BareCallConfig, CallConfig};
pub use config::{ConfigError, GenerationConfig, GenerationMode};
pub use context::{build_context, ContextBuilder, GenerationContext};
pub use naming::NamePolicy;
pub use type_mapping::{TargetType, TypeMapper, TypeMapping};

/// Re-export common types from appclient-common
pub use appclient_common::{Error, Result};
