//! Generates LuaBridge class registrations from C++ library headers.
//!
//! The pipeline per header is frontend → adapter → overload grouping →
//! rendering; [`BindingGenerator`] runs it over a directory and collects a
//! [`BatchReport`] whose script has the include list followed by one
//! `.beginClass ... .endClass()` block per accepted class.

pub mod batch;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod parsing;
pub mod render;

pub use batch::{BatchReport, BindingGenerator, HeaderFailure, SkipReason, SkippedHeader};
pub use config::Settings;
pub use error::{BindError, BindResult, HeaderError, HeaderResult};
pub use model::{ClassModel, Constructor, Method, Parameter};
pub use parsing::{CppHeaderParser, HeaderDecl, JsonTreeReader, SourceKind};
pub use render::{RenderOptions, RenderedHeader, render_class, render_script};
