//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success. Headers that failed individually do not change this;
//!   they are reported in the summary.
//! - `1`: General error
//! - `4`: A single header requested with `inspect` failed
//! - `5`: File I/O error (output sink, unreadable input directory)
//! - `6`: Configuration error

use crate::error::BindError;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// The requested header could not be processed (code 4)
    HeaderError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Convert a `BindError` to the appropriate exit code.
    pub fn from_error(error: &BindError) -> Self {
        match error {
            BindError::FileRead { .. } | BindError::FileWrite { .. } => ExitCode::IoError,
            BindError::ConfigError { .. } => ExitCode::ConfigError,
            BindError::Header { .. } => ExitCode::HeaderError,
            BindError::ParserInit { .. } => ExitCode::GeneralError,
        }
    }
}
