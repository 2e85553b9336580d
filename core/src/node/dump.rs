//! Indented structural dump of a tree, for logs and debugging.
//!
//! This is deliberately not a source renderer: each line shows a node kind
//! plus its salient scalar fields, nested by depth, which is what you want
//! when staring at a traversal or a half-finished rewrite.

use core::fmt::Write;

use crate::node::{FieldValue, Node, Scalar};

/// Render `node` as an indented, one-node-per-line structural listing.
pub fn dump(node: &Node<'_>) -> String {
    let mut out = String::new();
    write_node(&mut out, node, None, 0);
    out
}

fn write_node(out: &mut String, node: &Node<'_>, label: Option<String>, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    if let Some(label) = label {
        let _ = write!(out, "{label} = ");
    }
    let _ = writeln!(out, "{}", summary(node));

    for entry in node.fields() {
        if let FieldValue::Node(child) = entry.value {
            let label = match entry.index {
                Some(i) => format!("{}[{i}]", entry.name),
                None => entry.name.to_string(),
            };
            write_node(out, child, Some(label), indent + 1);
        }
    }
}

fn summary(node: &Node<'_>) -> String {
    match node {
        Node::Ident { name, .. } => format!("Ident({name})"),
        Node::Constant(value) => format!("Constant({})", scalar_summary(value)),
        Node::Field { field, .. } => format!("Field(.{field})"),
        Node::Binary { op, .. } => format!("Binary({})", op.symbol()),
        Node::Unary { op, .. } => format!("Unary({})", op.symbol()),
        Node::Keyword {
            name: Some(name), ..
        } => format!("Keyword({name})"),
        other => other.kind().name().to_string(),
    }
}

fn scalar_summary(value: &Scalar<'_>) -> String {
    match value {
        Scalar::Str(s) => format!("{s:?}"),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::None => "none".to_string(),
    }
}
