//! Output handling for the CLI.
//!
//! - [`OutputSink`]: buffered destination for the generated script
//! - [`OutputFormat`] and [`JsonResponse`]: text or JSON reporting
//! - [`ExitCode`]: process exit codes

pub mod exit_code;
pub mod format;
pub mod sink;

pub use exit_code::ExitCode;
pub use format::{ErrorDetails, JsonResponse, OutputFormat};
pub use sink::OutputSink;
