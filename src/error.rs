//! Error types for upspin-access
//!
//! This module defines the error hierarchy used throughout the crate.
//! Each concern gets its own `thiserror` enum; `AppError` aggregates them
//! at the command boundary, where they are mapped to exit codes.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("not an Access file: {0}")]
    NotAnAccessFile(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Process exit code for this error (2 for usage errors, 1 otherwise)
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// A grantee or path token that fails name syntax
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("malformed name {token:?}: {reason}")]
    Malformed { token: String, reason: &'static str },
}

impl NameError {
    pub fn malformed(token: impl Into<String>, reason: &'static str) -> Self {
        NameError::Malformed {
            token: token.into(),
            reason,
        }
    }
}

/// Failure to parse the contents of an Access file.
///
/// Parsing is fail-fast: the error always describes the first offending line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}:{line}: {kind}")]
pub struct ParseError {
    /// Path of the Access file being parsed
    pub path: String,
    /// 1-based line number
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(path: impl Into<String>, line: usize, kind: ParseErrorKind) -> Self {
        Self {
            path: path.into(),
            line,
            kind,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unknown right {0:?}")]
    UnknownRight(String),

    #[error("invalid grantee {token:?}")]
    InvalidGrantee {
        token: String,
        #[source]
        reason: NameError,
    },

    #[error("expected \"<rights>: <grantees>\", found no ':'")]
    MissingColon,

    #[error("invalid UTF-8")]
    InvalidUtf8,
}

/// Failure to apply a rights delta
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("invalid grantee {token:?}")]
    InvalidGrantee {
        token: String,
        #[source]
        reason: NameError,
    },

    #[error("unknown right {0:?}")]
    UnknownRight(String),

    #[error("no rights named")]
    NoRights,

    #[error("no grantees named")]
    NoGrantees,
}

/// Storage collaborator errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{path}: not found")]
    NotFound { path: String },

    #[error("{path}: modified concurrently, giving up")]
    Conflict { path: String },

    #[error("{path}: invalid storage path: {reason}")]
    InvalidPath {
        path: String,
        #[source]
        reason: NameError,
    },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
