//! Reader for dumped declaration trees.
//!
//! Accepts the JSON layout produced by dumping a parsed header:
//!
//! ```text
//! { namespace: { namespaces: { <ns>: { classes: [ { class_decl, methods } ] } } } }
//! ```
//!
//! and converts it into a [`HeaderDecl`], classifying problems as
//! structure, lookup or index errors with the path where they occurred.

use crate::error::{HeaderError, HeaderResult};
use crate::parsing::tree::{
    Access, ClassDecl, HeaderDecl, MemberDecl, NamespaceDecl, ParamDecl, ScopedName, TypeShape,
};
use serde_json::{Map, Value};

/// Keys that identify a known parameter type shape
const SHAPE_KEYS: &[&str] = &[
    "typename",
    "ref_to",
    "ptr_to",
    "moveref_to",
    "array_of",
    "return_type",
];

/// Converts JSON tree dumps for one namespace
#[derive(Debug, Clone)]
pub struct JsonTreeReader {
    namespace: String,
}

impl JsonTreeReader {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Parse JSON text and read the tree
    pub fn read_str(&self, text: &str) -> HeaderResult<HeaderDecl> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| HeaderError::parse(format!("invalid JSON tree: {e}")))?;
        self.read(&value)
    }

    /// Read the tree. Only the configured namespace and its first class are
    /// materialized; that is all the adapter consumes.
    pub fn read(&self, value: &Value) -> HeaderResult<HeaderDecl> {
        let root = Cursor::root(value);
        let scope = root
            .container("namespace")?
            .container("namespaces")?
            .container(&self.namespace)?;

        let classes = match scope.optional("classes")? {
            None => None,
            Some(list) => {
                let items = list.items()?;
                match items.first() {
                    Some(first) => Some(vec![read_class(first)?]),
                    None => Some(Vec::new()),
                }
            }
        };

        Ok(HeaderDecl::with_namespace(
            self.namespace.clone(),
            NamespaceDecl { classes },
        ))
    }
}

fn read_class(class: &Cursor) -> HeaderResult<ClassDecl> {
    let name = read_scoped(&class.key("class_decl")?.key("typename")?)?;

    let methods = match class.optional("methods")? {
        None => None,
        Some(list) => {
            let mut members = Vec::new();
            for item in list.items()? {
                if let Some(member) = read_member(&item)? {
                    members.push(member);
                }
            }
            Some(members)
        }
    };

    Ok(ClassDecl { name, methods })
}

/// Returns `None` for non-public members, which are not read any further.
fn read_member(member: &Cursor) -> HeaderResult<Option<MemberDecl>> {
    let access_cursor = member.key("access")?;
    let access_text = access_cursor.str()?;
    let access = Access::parse(access_text).ok_or_else(|| {
        HeaderError::structure(
            access_cursor.path.clone(),
            format!("unknown access specifier '{access_text}'"),
        )
    })?;
    if access != Access::Public {
        return Ok(None);
    }

    let constructor = member.key("constructor")?.bool()?;
    let destructor = member.key("destructor")?.bool()?;
    let name = read_scoped(&member.key("name")?)?;

    let return_type = match member.optional("return_type")? {
        None => None,
        Some(rt) => read_return(&rt)?,
    };

    let mut parameters = Vec::new();
    for param in member.key("parameters")?.items()? {
        parameters.push(read_param(&param)?);
    }

    Ok(Some(MemberDecl {
        name,
        access,
        constructor,
        destructor,
        return_type,
        parameters,
    }))
}

fn read_param(param: &Cursor) -> HeaderResult<ParamDecl> {
    let name = match param.optional("name")? {
        None => {
            // Present-but-null is fine; absent is not
            param.object()?.get("name").ok_or_else(|| {
                HeaderError::lookup(param.path.clone(), "name")
            })?;
            None
        }
        Some(n) => Some(n.str()?.to_string()),
    };
    let ty = read_type(&param.key("type")?)?;
    Ok(ParamDecl { name, ty })
}

fn read_type(ty: &Cursor) -> HeaderResult<TypeShape> {
    let obj = ty.object()?;

    if obj.contains_key("typename") {
        return Ok(TypeShape::Named(read_scoped(&ty.key("typename")?)?));
    }
    if obj.contains_key("ref_to") {
        let target = ty.key("ref_to")?;
        let target_obj = target.object()?;
        // Both `ref_to: {segments}` and `ref_to: {typename: {segments}}` occur
        if target_obj.contains_key("segments") {
            return Ok(TypeShape::RefTo(read_scoped(&target)?));
        }
        if target_obj.contains_key("typename") {
            return Ok(TypeShape::RefTo(read_scoped(&target.key("typename")?)?));
        }
        return Ok(TypeShape::Unsupported("reference to non-named type".into()));
    }
    if obj.contains_key("ptr_to") {
        return Ok(TypeShape::Unsupported("pointer".into()));
    }
    if obj.contains_key("moveref_to") {
        return Ok(TypeShape::Unsupported("rvalue reference".into()));
    }
    if obj.contains_key("array_of") {
        return Ok(TypeShape::Unsupported("array".into()));
    }
    if obj.contains_key("return_type") {
        return Ok(TypeShape::Unsupported("function type".into()));
    }

    let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    Err(HeaderError::structure(
        ty.path.clone(),
        format!(
            "unrecognized type shape with keys {keys:?}, expected one of {SHAPE_KEYS:?}"
        ),
    ))
}

/// Return types only matter when they are a direct named type.
fn read_return(rt: &Cursor) -> HeaderResult<Option<TypeShape>> {
    let obj = rt.object()?;
    if obj.is_empty() {
        return Ok(None);
    }
    if obj.contains_key("typename") {
        return Ok(Some(TypeShape::Named(read_scoped(&rt.key("typename")?)?)));
    }
    Ok(Some(TypeShape::Unsupported("non-named return type".into())))
}

fn read_scoped(node: &Cursor) -> HeaderResult<ScopedName> {
    let list = node.key("segments")?;
    let segments = list.items()?;
    if segments.is_empty() {
        return Err(HeaderError::index(list.path.clone(), 0));
    }

    let mut names = Vec::with_capacity(segments.len());
    for segment in &segments {
        names.push(segment.key("name")?.str()?.to_string());
    }
    Ok(ScopedName::new(names))
}

/// A position in the JSON tree, tracking its path for error messages
#[derive(Debug, Clone)]
struct Cursor<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Cursor<'a> {
    fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: "$".to_string(),
        }
    }

    fn child(&self, key: &str, value: &'a Value) -> Self {
        Self {
            value,
            path: format!("{}.{key}", self.path),
        }
    }

    fn object(&self) -> HeaderResult<&'a Map<String, Value>> {
        self.value.as_object().ok_or_else(|| {
            HeaderError::structure(
                self.path.clone(),
                format!("expected object, found {}", kind_of(self.value)),
            )
        })
    }

    /// Required leaf key: absence is a lookup error
    fn key(&self, key: &str) -> HeaderResult<Cursor<'a>> {
        match self.object()?.get(key) {
            Some(value) => Ok(self.child(key, value)),
            None => Err(HeaderError::lookup(self.path.clone(), key)),
        }
    }

    /// Required container key: absence means the layout is not supported
    fn container(&self, key: &str) -> HeaderResult<Cursor<'a>> {
        match self.object()?.get(key) {
            Some(value) => Ok(self.child(key, value)),
            None => Err(HeaderError::structure(
                self.path.clone(),
                format!("missing '{key}'"),
            )),
        }
    }

    /// Optional key; JSON null counts as absent
    fn optional(&self, key: &str) -> HeaderResult<Option<Cursor<'a>>> {
        match self.object()?.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(self.child(key, value))),
        }
    }

    fn items(&self) -> HeaderResult<Vec<Cursor<'a>>> {
        let list = self.value.as_array().ok_or_else(|| {
            HeaderError::structure(
                self.path.clone(),
                format!("expected list, found {}", kind_of(self.value)),
            )
        })?;
        Ok(list
            .iter()
            .enumerate()
            .map(|(i, value)| Cursor {
                value,
                path: format!("{}[{i}]", self.path),
            })
            .collect())
    }

    fn str(&self) -> HeaderResult<&'a str> {
        self.value.as_str().ok_or_else(|| {
            HeaderError::structure(
                self.path.clone(),
                format!("expected string, found {}", kind_of(self.value)),
            )
        })
    }

    fn bool(&self) -> HeaderResult<bool> {
        self.value.as_bool().ok_or_else(|| {
            HeaderError::structure(
                self.path.clone(),
                format!("expected bool, found {}", kind_of(self.value)),
            )
        })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
