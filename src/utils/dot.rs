//! DOT format utilities for flowgraph visualization.
//!
//! Block labels usually carry disassembled instructions, which contain quotes,
//! braces and generic type names. These helpers make them safe for Graphviz.

/// Escapes a string for safe use in DOT format labels and identifiers.
///
/// Handles every character with special meaning inside a quoted DOT label:
/// quotes, backslashes, line breaks, angle brackets, and record braces.
///
/// # Examples
///
/// ```rust
/// use cfgdom::utils::escape_dot;
///
/// assert_eq!(escape_dot("Vector.<int>"), "Vector.\\<int\\>");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
        .replace('<', "\\<")
        .replace('>', "\\>")
        .replace('{', "\\{")
        .replace('}', "\\}")
}

/// Returns the DOT node identifier used for a block index.
#[must_use]
pub fn dot_node_name(index: usize) -> String {
    format!("bb{index}")
}
