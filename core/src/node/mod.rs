//! The shared tree model.
//!
//! Every other component (walker, matcher, search, transform) is built on the
//! single primitive [`Node::fields`]: the ordered, flattened enumeration of a
//! composite node's children. Nodes are arena-allocated and immutable; a
//! rewrite produces new nodes rather than mutating old ones.

pub mod builder;
pub mod dump;

#[cfg(test)]
mod node_test;

use core::fmt;

use serde::Serialize;
use smallvec::SmallVec;

/// Binary operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
        }
    }
}

/// Unary operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    Neg,
    Not,
    Invert,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
            UnaryOp::Invert => "~",
        }
    }
}

/// Whether an identifier reference reads or writes the bound name.
///
/// Name-oblivious comparison only ignores identifiers that are read; a
/// written name is distinguishing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IdentContext {
    Load,
    Store,
}

impl IdentContext {
    pub fn symbol(self) -> &'static str {
        match self {
            IdentContext::Load => "load",
            IdentContext::Store => "store",
        }
    }
}

/// A terminal value carried by a field: no further structure.
///
/// `Option` fields of a node enumerate as [`Scalar::None`] when absent, so
/// that field alignment stays observable without special cases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Scalar<'arena> {
    Str(&'arena str),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

/// A tree node. Composite kinds carry their children as arena references;
/// [`Node::Constant`] wraps a terminal [`Scalar`].
///
/// The field set of each kind and the arity of each field (single vs.
/// sequence) are fixed by the variant, so two nodes of the same kind always
/// have structurally comparable layouts. `PartialEq` is deep structural
/// equality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node<'arena> {
    /// Top-level statement container.
    Module { body: &'arena [&'arena Node<'arena>] },
    Assign {
        targets: &'arena [&'arena Node<'arena>],
        value: &'arena Node<'arena>,
    },
    /// An expression in statement position.
    ExprStmt { value: &'arena Node<'arena> },
    /// A guarded scope: header expression, optional bound name, body.
    Block {
        guard: &'arena Node<'arena>,
        binding: Option<&'arena Node<'arena>>,
        body: &'arena [&'arena Node<'arena>],
    },
    Binary {
        op: BinaryOp,
        left: &'arena Node<'arena>,
        right: &'arena Node<'arena>,
    },
    Unary {
        op: UnaryOp,
        operand: &'arena Node<'arena>,
    },
    Call {
        callable: &'arena Node<'arena>,
        args: &'arena [&'arena Node<'arena>],
        kwargs: &'arena [&'arena Node<'arena>],
    },
    /// A named argument inside a call's `kwargs`; `name: None` is a splat.
    Keyword {
        name: Option<&'arena str>,
        value: &'arena Node<'arena>,
    },
    /// Attribute access: `value.field`.
    Field {
        value: &'arena Node<'arena>,
        field: &'arena str,
    },
    /// Subscript access: `value[index]`.
    Index {
        value: &'arena Node<'arena>,
        index: &'arena Node<'arena>,
    },
    Ident {
        name: &'arena str,
        ctx: IdentContext,
    },
    Constant(Scalar<'arena>),
}

/// Closed tag identifying a node's kind; used for dispatch and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Module,
    Assign,
    ExprStmt,
    Block,
    Binary,
    Unary,
    Call,
    Keyword,
    Field,
    Index,
    Ident,
    Constant,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::Assign => "Assign",
            NodeKind::ExprStmt => "ExprStmt",
            NodeKind::Block => "Block",
            NodeKind::Binary => "Binary",
            NodeKind::Unary => "Unary",
            NodeKind::Call => "Call",
            NodeKind::Keyword => "Keyword",
            NodeKind::Field => "Field",
            NodeKind::Index => "Index",
            NodeKind::Ident => "Ident",
            NodeKind::Constant => "Constant",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One enumerated field entry: either a child node or a terminal scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'arena> {
    Node(&'arena Node<'arena>),
    Scalar(Scalar<'arena>),
}

/// A flattened `(value, field_name, field_index)` entry.
///
/// `field_index` is `None` for singular fields and `Some(i)` for the `i`-th
/// element of a sequence field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldEntry<'arena> {
    pub value: FieldValue<'arena>,
    pub name: &'static str,
    pub index: Option<usize>,
}

impl<'arena> FieldEntry<'arena> {
    fn node(value: &'arena Node<'arena>, name: &'static str, index: Option<usize>) -> Self {
        Self {
            value: FieldValue::Node(value),
            name,
            index,
        }
    }

    fn scalar(value: Scalar<'arena>, name: &'static str) -> Self {
        Self {
            value: FieldValue::Scalar(value),
            name,
            index: None,
        }
    }
}

impl<'arena> Node<'arena> {
    /// Pointer identity of this node. Identity (not structural equality) is
    /// what keys the transform engine's substitution table: two structurally
    /// identical nodes at different addresses are distinct.
    pub fn as_ptr(&self) -> *const Self {
        self as *const _
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Module { .. } => NodeKind::Module,
            Node::Assign { .. } => NodeKind::Assign,
            Node::ExprStmt { .. } => NodeKind::ExprStmt,
            Node::Block { .. } => NodeKind::Block,
            Node::Binary { .. } => NodeKind::Binary,
            Node::Unary { .. } => NodeKind::Unary,
            Node::Call { .. } => NodeKind::Call,
            Node::Keyword { .. } => NodeKind::Keyword,
            Node::Field { .. } => NodeKind::Field,
            Node::Index { .. } => NodeKind::Index,
            Node::Ident { .. } => NodeKind::Ident,
            Node::Constant(_) => NodeKind::Constant,
        }
    }

    /// Enumerate this node's fields in declaration order, flattening sequence
    /// fields into individually indexed entries.
    ///
    /// This is the single primitive every traversal and comparison builds on.
    /// It preserves field declaration order and, within a sequence field,
    /// element order. The match below is exhaustive over the closed variant,
    /// so there is no "unknown node kind" failure mode.
    pub fn fields(&self) -> SmallVec<[FieldEntry<'arena>; 8]> {
        let mut out = SmallVec::new();
        match *self {
            Node::Module { body } => {
                push_seq(&mut out, body, "body");
            }
            Node::Assign { targets, value } => {
                push_seq(&mut out, targets, "targets");
                out.push(FieldEntry::node(value, "value", None));
            }
            Node::ExprStmt { value } => {
                out.push(FieldEntry::node(value, "value", None));
            }
            Node::Block {
                guard,
                binding,
                body,
            } => {
                out.push(FieldEntry::node(guard, "guard", None));
                match binding {
                    Some(b) => out.push(FieldEntry::node(b, "binding", None)),
                    None => out.push(FieldEntry::scalar(Scalar::None, "binding")),
                }
                push_seq(&mut out, body, "body");
            }
            Node::Binary { op, left, right } => {
                out.push(FieldEntry::node(left, "left", None));
                out.push(FieldEntry::scalar(Scalar::Str(op.symbol()), "op"));
                out.push(FieldEntry::node(right, "right", None));
            }
            Node::Unary { op, operand } => {
                out.push(FieldEntry::scalar(Scalar::Str(op.symbol()), "op"));
                out.push(FieldEntry::node(operand, "operand", None));
            }
            Node::Call {
                callable,
                args,
                kwargs,
            } => {
                out.push(FieldEntry::node(callable, "callable", None));
                push_seq(&mut out, args, "args");
                push_seq(&mut out, kwargs, "kwargs");
            }
            Node::Keyword { name, value } => {
                match name {
                    Some(n) => out.push(FieldEntry::scalar(Scalar::Str(n), "name")),
                    None => out.push(FieldEntry::scalar(Scalar::None, "name")),
                }
                out.push(FieldEntry::node(value, "value", None));
            }
            Node::Field { value, field } => {
                out.push(FieldEntry::node(value, "value", None));
                out.push(FieldEntry::scalar(Scalar::Str(field), "field"));
            }
            Node::Index { value, index } => {
                out.push(FieldEntry::node(value, "value", None));
                out.push(FieldEntry::node(index, "index", None));
            }
            Node::Ident { name, ctx } => {
                out.push(FieldEntry::scalar(Scalar::Str(name), "name"));
                out.push(FieldEntry::scalar(Scalar::Str(ctx.symbol()), "ctx"));
            }
            Node::Constant(value) => {
                out.push(FieldEntry::scalar(value, "value"));
            }
        }
        out
    }

    /// Fetch the field entry at `(name, index)`, or `None` if this node has
    /// no such entry. A singular field only answers to `index = None`; a
    /// sequence field only to `Some(i)` within bounds. A miss is how the
    /// matcher observes that a candidate lacks the shape a template demands.
    pub fn field_at(&self, name: &str, index: Option<usize>) -> Option<FieldValue<'arena>> {
        self.fields()
            .into_iter()
            .find(|entry| entry.name == name && entry.index == index)
            .map(|entry| entry.value)
    }

    /// Child nodes only, in `fields` order. Scalar entries are consulted by
    /// `fields` but carry no substructure to descend into.
    pub fn children(&self) -> SmallVec<[(&'arena Node<'arena>, &'static str, Option<usize>); 8]> {
        self.fields()
            .into_iter()
            .filter_map(|entry| match entry.value {
                FieldValue::Node(child) => Some((child, entry.name, entry.index)),
                FieldValue::Scalar(_) => None,
            })
            .collect()
    }
}

fn push_seq<'arena>(
    out: &mut SmallVec<[FieldEntry<'arena>; 8]>,
    items: &'arena [&'arena Node<'arena>],
    name: &'static str,
) {
    for (i, &item) in items.iter().enumerate() {
        out.push(FieldEntry::node(item, name, Some(i)));
    }
}
