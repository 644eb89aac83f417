//! Error types for rule configuration and the JumpStart catalog.

use thiserror::Error;

/// Errors raised while building or comparing debugger/profiler rule configs
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration conflict: {0}")]
    ConfigurationConflict(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Unknown built-in rule: {0}")]
    UnknownBuiltinRule(String),

    #[error("Malformed rule configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the external artifact-resolution collaborator.
///
/// These surface unchanged through [`CatalogError::Resolver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error("Must specify `model_scope` argument to retrieve model artifact uri for JumpStart models")]
    MissingScope,

    #[error("Unsupported scope '{scope}' for model {model_id}")]
    UnsupportedScope { model_id: String, scope: String },

    #[error("Model {model_id} version {version} has vulnerable dependencies: {dependencies:?}")]
    VulnerableModel {
        model_id: String,
        version: String,
        dependencies: Vec<String>,
    },

    #[error("Model {model_id} version {version} is deprecated")]
    DeprecatedModel { model_id: String, version: String },

    #[error("Model {model_id} version {version} not found in catalog")]
    ModelNotFound { model_id: String, version: String },

    #[error("JumpStart is not launched in region {0}")]
    RegionNotLaunched(String),
}

/// Errors raised by the JumpStart catalog types and `retrieve`
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{type_name}: missing required field '{field}'")]
    MissingField {
        type_name: &'static str,
        field: String,
    },

    #[error("{type_name}: invalid value for field '{field}': {message}")]
    InvalidField {
        type_name: &'static str,
        field: String,
        message: String,
    },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings and logging setup errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration validation failed:\n{0}")]
    Validation(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<config::ConfigError> for SettingsError {
    fn from(err: config::ConfigError) -> Self {
        SettingsError::Config(err.to_string())
    }
}
