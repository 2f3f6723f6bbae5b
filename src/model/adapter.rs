//! Declaration tree adapter
//!
//! Turns the declaration tree of one header into a [`ClassModel`]. The first
//! class of the configured namespace is used; everything else in the tree is
//! ignored.

use super::{ClassModel, Constructor, Method, Parameter};
use crate::error::{HeaderError, HeaderResult};
use crate::parsing::tree::{Access, HeaderDecl, MemberDecl, ParamDecl, ScopedName, TypeShape};

#[derive(Debug, Clone)]
pub struct AdapterOptions {
    /// Namespace holding the class
    pub namespace: String,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            namespace: "stk".to_string(),
        }
    }
}

/// Build the class model for one header
pub fn adapt(header: &HeaderDecl, options: &AdapterOptions) -> HeaderResult<ClassModel> {
    let ns_path = format!("namespace.namespaces.{}", options.namespace);

    let namespace = header.namespaces.get(&options.namespace).ok_or_else(|| {
        HeaderError::structure(
            "namespace.namespaces",
            format!("no namespace '{}'", options.namespace),
        )
    })?;

    let classes = namespace
        .classes
        .as_ref()
        .ok_or_else(|| HeaderError::structure(ns_path.clone(), "missing 'classes'"))?;

    let classes_path = format!("{ns_path}.classes");
    let class = classes
        .first()
        .ok_or_else(|| HeaderError::index(classes_path.clone(), 0))?;

    let class_path = format!("{classes_path}[0]");
    let name = simple_name(&class.name, &format!("{class_path}.class_decl.typename"))?;
    let mut model = ClassModel::new(name);

    let members = class
        .methods
        .as_ref()
        .ok_or_else(|| HeaderError::structure(class_path.clone(), "missing 'methods'"))?;

    for (i, member) in members.iter().enumerate() {
        if member.access != Access::Public {
            continue;
        }
        let member_path = format!("{class_path}.methods[{i}]");
        add_member(&mut model, member, &member_path)?;
    }

    tracing::debug!(
        class = %model.name,
        constructors = model.constructors.len(),
        methods = model.methods.len(),
        dropped_params = model.dropped_params,
        "adapted class"
    );

    Ok(model)
}

fn add_member(model: &mut ClassModel, member: &MemberDecl, path: &str) -> HeaderResult<()> {
    let name = simple_name(&member.name, &format!("{path}.name"))?;

    if member.constructor {
        let params = resolve_params(model, &member.parameters, path)?;
        model.constructors.push(Constructor { name, params });
    } else if member.destructor {
        model.destructor_name = Some(name);
    } else {
        let mut method = Method::new(name);
        if let Some(TypeShape::Named(ty)) = &member.return_type {
            method.returns = Some(type_name(ty, &format!("{path}.return_type.typename"))?);
        }
        method.params = resolve_params(model, &member.parameters, path)?;
        model.methods.push(method);
    }

    Ok(())
}

/// Resolve the two modeled shapes; anything else is dropped and counted.
fn resolve_params(
    model: &mut ClassModel,
    params: &[ParamDecl],
    path: &str,
) -> HeaderResult<Vec<Parameter>> {
    let mut resolved = Vec::with_capacity(params.len());

    for (i, param) in params.iter().enumerate() {
        let param_path = format!("{path}.parameters[{i}].type");
        let (scoped, is_reference) = match &param.ty {
            TypeShape::Named(name) => (name, false),
            TypeShape::RefTo(name) => (name, true),
            TypeShape::Unsupported(shape) => {
                model.dropped_params += 1;
                tracing::debug!(
                    class = %model.name,
                    param = param.name.as_deref().unwrap_or(""),
                    shape = %shape,
                    "dropping parameter with unsupported type shape"
                );
                continue;
            }
        };

        let ty = type_name(scoped, &param_path)?;
        let name = param.name.clone().unwrap_or_default();
        let parameter = Parameter::new(name, ty, is_reference)
            .ok_or_else(|| HeaderError::index(format!("{param_path}.segments"), 0))?;
        resolved.push(parameter);
    }

    Ok(resolved)
}

fn simple_name(name: &ScopedName, path: &str) -> HeaderResult<String> {
    name.simple()
        .map(str::to_string)
        .ok_or_else(|| HeaderError::index(format!("{path}.segments"), 0))
}

fn type_name(name: &ScopedName, path: &str) -> HeaderResult<String> {
    if name.is_empty() {
        return Err(HeaderError::index(format!("{path}.segments"), 0));
    }
    Ok(name.joined())
}
