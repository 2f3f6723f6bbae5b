//! Whole-script assembly: include list, blank line, class blocks.

use serde::Serialize;

/// Rendered output of one accepted header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedHeader {
    /// File name used in the `#include` line, `ADSR.h`
    pub include: String,
    pub class_name: String,
    /// Registration block from [`super::render_class`]
    pub text: String,
}

/// Assemble the registration script.
///
/// Includes are sorted by file name; class blocks keep the order given.
/// Each line, including the last, ends with a newline.
pub fn render_script(headers: &[RenderedHeader]) -> String {
    let mut includes: Vec<&str> = headers.iter().map(|h| h.include.as_str()).collect();
    includes.sort_unstable();

    let mut out = String::new();
    for include in includes {
        out.push_str(&format!("#include \"{include}\"\n"));
    }
    out.push('\n');

    for header in headers {
        out.push_str(&header.text);
        out.push('\n');
    }
    out
}
