use std::path::PathBuf;
use thiserror::Error;

/// Syntax error in a Lua data chunk
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Failure to turn an export file into a raw table
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("global '{name}' not defined in {path:?}")]
    MissingGlobal { path: PathBuf, name: String },
    #[error("global '{name}' in {path:?} is not a table")]
    NotATable { path: PathBuf, name: String },
}

/// A typed field could not be read from a raw table
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{record}.{field}: {reason}")]
pub struct ValidationError {
    pub record: String,
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(
        record: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            record: record.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error for sitac loading, discovery and briefing operations
#[derive(Debug, Error)]
pub enum SitacError {
    #[error("config: {0}")]
    Config(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("sitac without zones")]
    EmptyZones,
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid edit token")]
    Forbidden,
    #[error("storage error on {path:?}: {message}")]
    Storage { path: PathBuf, message: String },
}

impl SitacError {
    pub fn not_found(what: impl Into<String>) -> Self {
        SitacError::NotFound(what.into())
    }

    pub fn storage(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        SitacError::Storage {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = SitacError> = std::result::Result<T, E>;
