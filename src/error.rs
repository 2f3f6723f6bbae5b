//! Error types for binding generation
//!
//! Two layers, both built with thiserror:
//! - [`HeaderError`] is scoped to one header. The batch driver catches it,
//!   logs it, and moves on to the next header.
//! - [`BindError`] is scoped to the whole run (config, output sink, parser
//!   setup) and ends the command.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning one header into a class model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The tree does not have the single supported layout
    #[error("Unexpected tree structure at '{path}': {reason}")]
    Structure { path: String, reason: String },

    /// A key expected by the extraction path is absent
    #[error("Missing key '{key}' at '{path}'")]
    Lookup { path: String, key: String },

    /// An expected list element is absent because the list is too short
    #[error("No element {index} in list at '{path}'")]
    Index { path: String, index: usize },

    /// The header (or its tree dump) could not be parsed at all
    #[error("Failed to parse header: {reason}")]
    Parse { reason: String },
}

impl HeaderError {
    pub fn structure(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Structure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn lookup(path: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Lookup {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn index(path: impl Into<String>, index: usize) -> Self {
        Self::Index {
            path: path.into(),
            index,
        }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    /// Failure kind as written to the failure log.
    pub fn kind_code(&self) -> &'static str {
        match self {
            Self::Structure { .. } => "structure-error",
            Self::Lookup { .. } => "lookup-error",
            Self::Index { .. } => "index-error",
            Self::Parse { .. } => "parse-error",
        }
    }
}

/// Main error type for a generator run
#[derive(Error, Debug)]
pub enum BindError {
    /// File system errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    /// The header frontend could not be set up
    #[error("Failed to initialize C++ parser: {reason}")]
    ParserInit { reason: String },

    /// A single header failed and the caller asked for it directly
    #[error("Header '{header}' failed: {source}")]
    Header {
        header: String,
        #[source]
        source: HeaderError,
    },
}

impl BindError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileWrite { .. } => "FILE_WRITE_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::ParserInit { .. } => "PARSER_INIT_ERROR",
            Self::Header { .. } => "HEADER_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Pass the header directory explicitly: 'stkbind generate <DIR>'",
            ],
            Self::FileWrite { .. } => vec![
                "Check that the output directory exists and is writable",
                "Omit --output to write the script to stdout",
            ],
            Self::ConfigError { .. } => vec![
                "Run 'stkbind config' to see the effective settings",
                "Run 'stkbind init --force' to regenerate .stkbind/settings.toml",
            ],
            Self::Header { source, .. } => match source {
                HeaderError::Parse { .. } => {
                    vec!["Check that the file is a C++ header or a JSON tree dump"]
                }
                _ => vec![
                    "Check that the header declares one class inside the configured namespace",
                    "Use --namespace if the class lives in a different namespace",
                ],
            },
            _ => vec![],
        }
    }
}

/// Result type alias for per-header operations
pub type HeaderResult<T> = Result<T, HeaderError>;

/// Result type alias for run-level operations
pub type BindResult<T> = Result<T, BindError>;
