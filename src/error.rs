use thiserror::Error;

use crate::domain::filter::Operator;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The payload could not be decoded into the entity's record type.
    #[error("invalid payload for {entity}: {reason}")]
    Payload { entity: String, reason: String },

    /// The record's business identifier is missing, not a string, or blank.
    #[error("invalid business identifier for {entity}: {reason}")]
    InvalidIdentifier { entity: String, reason: String },

    /// An update payload carries a different identifier than the target.
    #[error("business identifier mismatch: expected '{expected}', got '{actual}'")]
    IdentifierMismatch { expected: String, actual: String },

    #[error("unsupported {op} filter value of type {value_type}")]
    UnsupportedFilterValue { op: Operator, value_type: String },

    #[error("invalid filter field '{field}': {reason}")]
    InvalidFilterField { field: String, reason: String },

    #[error("invalid entity descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("invalid store name '{name}': {reason}")]
    InvalidStoreName { name: String, reason: String },

    #[error("store '{store}' is closed")]
    StoreClosed { store: String },

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures reported by the embedded engine rather than by
    /// validation. These are the only errors worth retrying.
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::Connection(_) | Error::Io(_))
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for Error {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Error::Connection(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
