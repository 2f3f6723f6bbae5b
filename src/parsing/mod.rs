//! Declaration tree frontends.
//!
//! Every frontend produces a [`HeaderDecl`]; the rest of the pipeline never
//! sees the input format.

pub mod cpp;
pub mod json;
pub mod tree;

pub use cpp::CppHeaderParser;
pub use json::JsonTreeReader;
pub use tree::{
    Access, ClassDecl, HeaderDecl, MemberDecl, NamespaceDecl, ParamDecl, SCOPE_SEPARATOR,
    ScopedName, TypeShape,
};

use std::path::Path;

/// Input format of a discovered file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A dumped declaration tree
    JsonTree,
    /// A C++ header parsed with tree-sitter
    Header,
}

impl SourceKind {
    /// Pick the frontend by file extension
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::JsonTree,
            _ => Self::Header,
        }
    }
}
