//! Evaluator configuration parsing and validation.
//!
//! Configs are YAML or JSON documents checked against an embedded JSON
//! Schema, then deserialized and checked semantically.

mod parser;
mod schema;

pub use parser::{ClassifierSpec, ConfigError, GibberishConfig, DEFAULT_THRESHOLD};
pub use schema::validate_config_schema;
