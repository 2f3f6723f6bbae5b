//! LuaBridge registration rendering
//!
//! Rendering is a pure projection of an annotated [`ClassModel`] into text.
//! Overload sets come from [`group_overloads`], so each distinct method name
//! is rendered once, at its first occurrence, with all its siblings.

pub mod script;

pub use script::{RenderedHeader, render_script};

use crate::config::RenderConfig;
use crate::model::{ClassModel, Constructor, Method, OverloadGroup, Parameter, group_overloads};

const INDENT: &str = "    ";
const ENTRY_INDENT: &str = "        ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Namespace the class lives in, `stk` in `&stk::ADSR::tick`
    pub namespace: String,
    /// Parameter types starting with this token get `namespace::` prepended
    pub type_prefix: String,
    /// Namespace of the `overload` helper
    pub bridge_namespace: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            type_prefix: config.type_prefix.clone(),
            bridge_namespace: config.bridge_namespace.clone(),
        }
    }
}

impl RenderOptions {
    /// Qualify a parameter type: prefix match on the type spelling, then
    /// a trailing `&` for references.
    ///
    /// The prefix check is plain string matching. `Stkish` is qualified just
    /// like `StkFloat`.
    pub fn decorate(&self, param: &Parameter) -> String {
        let ty = param.ty();
        let mut out = if !self.type_prefix.is_empty() && ty.starts_with(&self.type_prefix) {
            qualify(&self.namespace, ty)
        } else {
            ty.to_string()
        };
        if param.is_reference() {
            out.push('&');
        }
        out
    }
}

/// Render the registration block of one class
pub fn render_class(class: &ClassModel, options: &RenderOptions) -> String {
    let qualified = qualify(&options.namespace, &class.name);
    let mut lines = Vec::with_capacity(class.constructors.len() + class.methods.len() + 2);

    lines.push(format!(".beginClass <{qualified}> (\"{}\")", class.name));

    for ctor in &class.constructors {
        lines.push(render_constructor(ctor, options));
    }

    for group in group_overloads(&class.methods) {
        render_group(&mut lines, class, &group, &qualified, options);
    }

    lines.push(".endClass()".to_string());
    lines.join("\n")
}

fn render_constructor(ctor: &Constructor, options: &RenderOptions) -> String {
    if ctor.params.is_empty() {
        return format!("{INDENT}.addConstructor<void ()> ()");
    }

    let params = ctor
        .params
        .iter()
        .map(|p| {
            let ty = options.decorate(p);
            if p.name().is_empty() {
                ty
            } else {
                format!("{ty} {}", p.name())
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("{INDENT}.addConstructor<void (*) ({params})>()")
}

fn render_group(
    lines: &mut Vec<String>,
    class: &ClassModel,
    group: &OverloadGroup,
    qualified: &str,
    options: &RenderOptions,
) {
    let member_ref = format!("&{qualified}::{}", group.name);

    if !group.is_overload_set() {
        lines.push(format!(
            "{INDENT}.addFunction(\"{}\", {member_ref})",
            group.name
        ));
        return;
    }

    let overload = qualify(&options.bridge_namespace, "overload");
    lines.push(format!("{INDENT}.addFunction(\"{}\", ", group.name));

    let last = group.count() - 1;
    for (pos, &i) in group.members.iter().enumerate() {
        let method: &Method = &class.methods[i];
        let params = method
            .params
            .iter()
            .map(|p| options.decorate(p))
            .collect::<Vec<_>>()
            .join(", ");
        let terminator = if pos == last { ")" } else { "," };
        lines.push(format!(
            "{ENTRY_INDENT}{overload}<{params}>({member_ref}){terminator}"
        ));
    }
}

fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}::{name}")
    }
}
