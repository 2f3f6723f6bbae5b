//! Normalized class model
//!
//! One [`ClassModel`] per header: built by the adapter, annotated by the
//! overload grouper, consumed by the renderer.

pub mod adapter;
pub mod overload;

pub use adapter::{AdapterOptions, adapt};
pub use overload::{OverloadGroup, annotate_overloads, group_overloads};

use serde::Serialize;

/// A resolved parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    is_reference: bool,
}

impl Parameter {
    /// Returns `None` when `ty` is empty; a parameter always has a type.
    pub fn new(name: impl Into<String>, ty: impl Into<String>, is_reference: bool) -> Option<Self> {
        let ty = ty.into();
        if ty.trim().is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            ty,
            is_reference,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type name without the reference marker
    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn is_reference(&self) -> bool {
        self.is_reference
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constructor {
    pub name: String,
    pub params: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    pub params: Vec<Parameter>,
    pub returns: Option<String>,
    /// Set by the overload grouper
    pub is_overloaded: bool,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            is_overloaded: false,
        }
    }
}

/// Public interface of one class.
///
/// `methods` keeps every physical declaration in source order, overload
/// siblings included. It is never re-sorted or merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassModel {
    pub name: String,
    pub destructor_name: Option<String>,
    pub constructors: Vec<Constructor>,
    pub methods: Vec<Method>,
    /// Parameters left out because their type shape is not modeled
    pub dropped_params: usize,
}

impl ClassModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            destructor_name: None,
            constructors: Vec::new(),
            methods: Vec::new(),
            dropped_params: 0,
        }
    }

    /// Number of physical declarations named `name`
    pub fn count_methods(&self, name: &str) -> usize {
        self.methods.iter().filter(|m| m.name == name).count()
    }
}
