//! C++ header frontend built on tree-sitter
//!
//! Produces the same [`HeaderDecl`] as a JSON tree dump, straight from
//! header text. Only what the class model needs is extracted: top-level
//! namespaces, the classes inside them, and their member functions with
//! access, parameters and return types. No preprocessing is done.

use crate::error::{BindError, BindResult, HeaderError, HeaderResult};
use crate::parsing::tree::{
    Access, ClassDecl, HeaderDecl, MemberDecl, NamespaceDecl, ParamDecl, ScopedName, TypeShape,
};
use tree_sitter::{Node, Parser};

pub struct CppHeaderParser {
    parser: Parser,
}

impl std::fmt::Debug for CppHeaderParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CppHeaderParser")
            .field("language", &"C++")
            .finish()
    }
}

impl CppHeaderParser {
    pub fn new() -> BindResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| BindError::ParserInit {
                reason: format!("Failed to set C++ language: {e}"),
            })?;

        Ok(Self { parser })
    }

    /// Parse header text into a declaration tree
    pub fn parse(&mut self, code: &str) -> HeaderResult<HeaderDecl> {
        let tree = self
            .parser
            .parse(code, None)
            .ok_or_else(|| HeaderError::parse("tree-sitter returned no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!("header contains syntax errors, extracting what parsed");
        }

        let mut header = HeaderDecl::default();
        Self::collect_namespaces(root, code, &mut header);
        Ok(header)
    }

    /// Register top-level namespaces. Reopened namespaces are merged.
    fn collect_namespaces(node: Node, code: &str, header: &mut HeaderDecl) {
        for i in 0..node.child_count() {
            let Some(child) = node.child(i) else { continue };
            match child.kind() {
                "namespace_definition" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|n| code[n.byte_range()].trim().to_string())
                        .unwrap_or_default();
                    let mut classes = Vec::new();
                    if let Some(body) = child.child_by_field_name("body") {
                        Self::collect_classes(body, code, &mut classes);
                    }

                    let ns = header.namespaces.entry(name).or_insert_with(|| NamespaceDecl {
                        classes: Some(Vec::new()),
                    });
                    ns.classes.get_or_insert_with(Vec::new).extend(classes);
                }
                kind if is_preproc_block(kind) => {
                    Self::collect_namespaces(child, code, header);
                }
                _ => {}
            }
        }
    }

    /// Collect class definitions (not forward declarations) in a scope body
    fn collect_classes(node: Node, code: &str, classes: &mut Vec<ClassDecl>) {
        for i in 0..node.child_count() {
            let Some(child) = node.child(i) else { continue };
            match child.kind() {
                "class_specifier" | "struct_specifier" => {
                    if let Some(class) = Self::extract_class(child, code) {
                        classes.push(class);
                    }
                }
                "declaration" | "type_definition" => {
                    if let Some(ty) = child.child_by_field_name("type") {
                        if matches!(ty.kind(), "class_specifier" | "struct_specifier") {
                            if let Some(class) = Self::extract_class(ty, code) {
                                classes.push(class);
                            }
                        }
                    }
                }
                kind if is_preproc_block(kind) => {
                    Self::collect_classes(child, code, classes);
                }
                _ => {}
            }
        }
    }

    fn extract_class(node: Node, code: &str) -> Option<ClassDecl> {
        let body = node.child_by_field_name("body")?;
        let name_node = node.child_by_field_name("name")?;
        let name = ScopedName::new(split_scope(&code[name_node.byte_range()]));
        let class_name = name.simple()?.to_string();

        let default_access = if node.kind() == "struct_specifier" {
            Access::Public
        } else {
            Access::Private
        };

        let mut methods = Vec::new();
        let mut access = default_access;
        Self::extract_members(body, code, &class_name, &mut access, &mut methods);

        Some(ClassDecl {
            name,
            methods: Some(methods),
        })
    }

    fn extract_members(
        body: Node,
        code: &str,
        class_name: &str,
        access: &mut Access,
        methods: &mut Vec<MemberDecl>,
    ) {
        for i in 0..body.child_count() {
            let Some(child) = body.child(i) else { continue };
            match child.kind() {
                "access_specifier" => {
                    let text = code[child.byte_range()].trim_end_matches(':').trim();
                    if let Some(parsed) = Access::parse(text) {
                        *access = parsed;
                    }
                }
                "field_declaration" | "declaration" | "function_definition" => {
                    if let Some(member) = Self::extract_member(child, code, class_name, *access)
                    {
                        methods.push(member);
                    }
                }
                kind if is_preproc_block(kind) => {
                    Self::extract_members(child, code, class_name, access, methods);
                }
                _ => {}
            }
        }
    }

    /// Build a member from a declaration whose declarator is a function
    fn extract_member(
        node: Node,
        code: &str,
        class_name: &str,
        access: Access,
    ) -> Option<MemberDecl> {
        let declarator = node.child_by_field_name("declarator")?;
        let (function, wrappers) = unwrap_to_function(declarator)?;
        let name_node = function.child_by_field_name("declarator")?;
        let type_node = node.child_by_field_name("type");

        let destructor = name_node.kind() == "destructor_name";
        let name = member_name(name_node, code);
        let constructor = !destructor && type_node.is_none() && name == class_name;

        let return_type = if constructor || destructor {
            None
        } else {
            type_node.map(|ty| shape_for(ty, code, &wrappers))
        };

        let parameters = function
            .child_by_field_name("parameters")
            .map(|list| extract_parameters(list, code))
            .unwrap_or_default();

        Some(MemberDecl {
            name: ScopedName::new([name]),
            access,
            constructor,
            destructor,
            return_type,
            parameters,
        })
    }
}

fn extract_parameters(list: Node, code: &str) -> Vec<ParamDecl> {
    let mut params = Vec::new();
    for i in 0..list.named_child_count() {
        let Some(param) = list.named_child(i) else { continue };
        if !matches!(
            param.kind(),
            "parameter_declaration" | "optional_parameter_declaration"
        ) {
            continue;
        }
        let Some(ty) = param.child_by_field_name("type") else {
            continue;
        };

        let declarator = param.child_by_field_name("declarator");
        let wrappers = declarator.map(declarator_chain).unwrap_or_default();
        let name = declarator.and_then(|d| innermost_identifier(d, code));
        params.push(ParamDecl {
            name,
            ty: shape_for(ty, code, &wrappers),
        });
    }

    // `f(void)` declares no parameters
    if params.len() == 1
        && params[0].name.is_none()
        && params[0].ty == TypeShape::Named(ScopedName::new(["void"]))
    {
        params.clear();
    }
    params
}

/// Declarator wrappers between a declaration and its name, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Reference,
    RvalueReference,
    Pointer,
    Array,
    Function,
}

/// Walk down reference/pointer declarators to the function declarator
fn unwrap_to_function(declarator: Node) -> Option<(Node, Vec<Wrapper>)> {
    let mut wrappers = Vec::new();
    let mut current = declarator;
    loop {
        match current.kind() {
            "function_declarator" => return Some((current, wrappers)),
            "reference_declarator" => {
                wrappers.push(reference_kind(current));
                current = inner_declarator(current)?;
            }
            "pointer_declarator" => {
                wrappers.push(Wrapper::Pointer);
                current = inner_declarator(current)?;
            }
            _ => return None,
        }
    }
}

/// Wrappers of a parameter declarator, outermost first
fn declarator_chain(declarator: Node) -> Vec<Wrapper> {
    let mut wrappers = Vec::new();
    let mut current = Some(declarator);
    while let Some(node) = current {
        let wrapper = match node.kind() {
            "reference_declarator" | "abstract_reference_declarator" => reference_kind(node),
            "pointer_declarator" | "abstract_pointer_declarator" => Wrapper::Pointer,
            "array_declarator" | "abstract_array_declarator" => Wrapper::Array,
            "function_declarator" | "abstract_function_declarator" => Wrapper::Function,
            _ => break,
        };
        wrappers.push(wrapper);
        current = inner_declarator(node);
    }
    wrappers
}

fn reference_kind(node: Node) -> Wrapper {
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.kind() == "&&" {
                return Wrapper::RvalueReference;
            }
        }
    }
    Wrapper::Reference
}

fn inner_declarator(node: Node) -> Option<Node> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }
    // reference_declarator carries its inner declarator without a field name
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .find(|child| is_declarator_kind(child.kind()))
}

fn is_declarator_kind(kind: &str) -> bool {
    kind.ends_with("declarator")
        || matches!(
            kind,
            "identifier"
                | "field_identifier"
                | "qualified_identifier"
                | "operator_name"
                | "destructor_name"
        )
}

fn innermost_identifier(declarator: Node, code: &str) -> Option<String> {
    if matches!(declarator.kind(), "identifier" | "field_identifier") {
        return Some(code[declarator.byte_range()].to_string());
    }
    inner_declarator(declarator).and_then(|inner| innermost_identifier(inner, code))
}

fn shape_for(ty: Node, code: &str, wrappers: &[Wrapper]) -> TypeShape {
    let name = ScopedName::new(split_scope(&code[ty.byte_range()]));
    match wrappers {
        [] => TypeShape::Named(name),
        [Wrapper::Reference] => TypeShape::RefTo(name),
        [Wrapper::RvalueReference, ..] => TypeShape::Unsupported("rvalue reference".into()),
        [Wrapper::Pointer, ..] => TypeShape::Unsupported("pointer".into()),
        [Wrapper::Array, ..] => TypeShape::Unsupported("array".into()),
        [Wrapper::Function, ..] => TypeShape::Unsupported("function type".into()),
        [Wrapper::Reference, ..] => TypeShape::Unsupported("reference to non-named type".into()),
    }
}

fn member_name(node: Node, code: &str) -> String {
    let text = code[node.byte_range()].trim();
    match text.strip_prefix("operator") {
        Some(rest) if node.kind() == "operator_name" => {
            let symbol: String = rest.split_whitespace().collect::<Vec<_>>().join(" ");
            if symbol.starts_with(|c: char| c.is_alphabetic()) {
                format!("operator {symbol}")
            } else {
                format!("operator{}", symbol.replace(' ', ""))
            }
        }
        _ => text.split_whitespace().collect(),
    }
}

/// Split a type spelling on `::` outside template brackets, normalizing
/// whitespace inside each segment.
fn split_scope(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                depth += 1;
                current.push(c);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ':' if depth == 0 && chars.peek() == Some(&':') => {
                chars.next();
                push_segment(&mut segments, &current);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    push_segment(&mut segments, &current);
    segments
}

fn push_segment(segments: &mut Vec<String>, raw: &str) {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalized.is_empty() {
        segments.push(normalized);
    }
}

fn is_preproc_block(kind: &str) -> bool {
    matches!(
        kind,
        "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif" | "linkage_specification"
    )
}
