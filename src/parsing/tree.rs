//! Typed declaration tree shared by all frontends.
//!
//! Frontends (JSON tree dumps, the tree-sitter header parser) produce a
//! [`HeaderDecl`]; the adapter in [`crate::model::adapter`] consumes it.
//! The layout mirrors the dumped tree: a root scope with named child
//! namespaces, each holding classes, each holding member declarations.

use serde::Serialize;
use std::collections::BTreeMap;

/// Scope separator used when joining name segments
pub const SCOPE_SEPARATOR: &str = "::";

/// Declaration tree of one header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderDecl {
    /// Child namespaces of the root scope, keyed by namespace name
    pub namespaces: BTreeMap<String, NamespaceDecl>,
}

/// One namespace scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamespaceDecl {
    /// `None` when the tree carries no class list at all
    pub classes: Option<Vec<ClassDecl>>,
}

/// One class declaration with its members in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDecl {
    pub name: ScopedName,
    /// `None` when the tree carries no member list at all
    pub methods: Option<Vec<MemberDecl>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// A member function declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDecl {
    pub name: ScopedName,
    pub access: Access,
    pub constructor: bool,
    pub destructor: bool,
    pub return_type: Option<TypeShape>,
    pub parameters: Vec<ParamDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDecl {
    pub name: Option<String>,
    pub ty: TypeShape,
}

/// Shape of a declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeShape {
    /// A direct named type, `StkFloat` or `std::string`
    Named(ScopedName),
    /// An lvalue reference to a named type, `StkFrames&`
    RefTo(ScopedName),
    /// A shape the model does not carry (pointer, rvalue reference, array,
    /// function type, reference to pointer)
    Unsupported(String),
}

/// A possibly qualified name, split on `::`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopedName {
    pub segments: Vec<String>,
}

impl ScopedName {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse `a::b::c` into its segments. Whitespace around segments is dropped.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.split(SCOPE_SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    /// Last segment, the unqualified name
    pub fn simple(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// All segments joined with the scope separator
    pub fn joined(&self) -> String {
        self.segments.join(SCOPE_SEPARATOR)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl HeaderDecl {
    /// Build a tree with a single namespace
    pub fn with_namespace(name: impl Into<String>, ns: NamespaceDecl) -> Self {
        let mut namespaces = BTreeMap::new();
        namespaces.insert(name.into(), ns);
        Self { namespaces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_name_parse_and_join() {
        let name = ScopedName::parse("stk :: StkFrames");
        assert_eq!(name.segments, vec!["stk", "StkFrames"]);
        assert_eq!(name.joined(), "stk::StkFrames");
        assert_eq!(name.simple(), Some("StkFrames"));
    }

    #[test]
    fn test_fundamental_type_is_one_segment() {
        let name = ScopedName::parse("unsigned int");
        assert_eq!(name.segments, vec!["unsigned int"]);
        assert!(ScopedName::parse("").is_empty());
    }

    #[test]
    fn test_access_parse() {
        assert_eq!(Access::parse("public"), Some(Access::Public));
        assert_eq!(Access::parse("private"), Some(Access::Private));
        assert_eq!(Access::parse("friend"), None);
    }
}
