//! Error types for the companion pipeline.
//!
//! None of these are fatal to a decision call: contract errors are returned at
//! the input boundary before a snapshot reaches the pipeline, while store and
//! persona-config errors are logged by their callers and recovered locally.

use thiserror::Error;

use crate::contracts::Personality;

/// Errors raised while decoding or validating a context snapshot.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decoding failed (includes tags outside a closed set).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A string tag did not name a member of its closed set.
    #[error("unknown {kind} tag: {value:?}")]
    UnknownTag { kind: &'static str, value: String },

    /// A structurally valid field carried an unusable value.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Errors from loading or saving the value table document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the persona source document.
#[derive(Debug, Error)]
pub enum PersonaConfigError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed but lacks an entry for a personality.
    #[error("persona document has no entry for {0}")]
    Missing(Personality),
}

/// Errors from the pipeline configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A parameter is outside its valid range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors from command-line argument parsing.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("invalid value for {flag}: {value:?}")]
    InvalidValue { flag: &'static str, value: String },
}
