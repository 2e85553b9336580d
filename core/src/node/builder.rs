//! Arena-backed construction of tree nodes.
//!
//! Parsing source text into trees is a collaborator concern; programmatic
//! construction is how templates and fixtures are authored in-core. All
//! strings and child slices are interned into the builder's arena, so the
//! resulting nodes borrow from a single allocation scope.

use bumpalo::Bump;

use crate::node::{BinaryOp, IdentContext, Node, Scalar, UnaryOp};

/// Builds [`Node`] values in a bump arena.
///
/// The builder is `Copy`-cheap to pass around; it only holds the arena
/// reference.
#[derive(Debug, Clone, Copy)]
pub struct NodeBuilder<'arena> {
    arena: &'arena Bump,
}

impl<'arena> NodeBuilder<'arena> {
    pub fn new(arena: &'arena Bump) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> &'arena Bump {
        self.arena
    }

    fn alloc(&self, node: Node<'arena>) -> &'arena Node<'arena> {
        self.arena.alloc(node)
    }

    fn alloc_nodes(&self, nodes: &[&'arena Node<'arena>]) -> &'arena [&'arena Node<'arena>] {
        self.arena.alloc_slice_copy(nodes)
    }

    pub fn module(&self, body: &[&'arena Node<'arena>]) -> &'arena Node<'arena> {
        self.alloc(Node::Module {
            body: self.alloc_nodes(body),
        })
    }

    pub fn assign(
        &self,
        targets: &[&'arena Node<'arena>],
        value: &'arena Node<'arena>,
    ) -> &'arena Node<'arena> {
        self.alloc(Node::Assign {
            targets: self.alloc_nodes(targets),
            value,
        })
    }

    pub fn expr_stmt(&self, value: &'arena Node<'arena>) -> &'arena Node<'arena> {
        self.alloc(Node::ExprStmt { value })
    }

    pub fn block(
        &self,
        guard: &'arena Node<'arena>,
        binding: Option<&'arena Node<'arena>>,
        body: &[&'arena Node<'arena>],
    ) -> &'arena Node<'arena> {
        self.alloc(Node::Block {
            guard,
            binding,
            body: self.alloc_nodes(body),
        })
    }

    pub fn binary(
        &self,
        op: BinaryOp,
        left: &'arena Node<'arena>,
        right: &'arena Node<'arena>,
    ) -> &'arena Node<'arena> {
        self.alloc(Node::Binary { op, left, right })
    }

    pub fn unary(&self, op: UnaryOp, operand: &'arena Node<'arena>) -> &'arena Node<'arena> {
        self.alloc(Node::Unary { op, operand })
    }

    pub fn call(
        &self,
        callable: &'arena Node<'arena>,
        args: &[&'arena Node<'arena>],
        kwargs: &[&'arena Node<'arena>],
    ) -> &'arena Node<'arena> {
        self.alloc(Node::Call {
            callable,
            args: self.alloc_nodes(args),
            kwargs: self.alloc_nodes(kwargs),
        })
    }

    pub fn keyword(
        &self,
        name: Option<&str>,
        value: &'arena Node<'arena>,
    ) -> &'arena Node<'arena> {
        self.alloc(Node::Keyword {
            name: name.map(|n| &*self.arena.alloc_str(n)),
            value,
        })
    }

    /// Attribute access `value.field`.
    pub fn field(&self, value: &'arena Node<'arena>, field: &str) -> &'arena Node<'arena> {
        self.alloc(Node::Field {
            value,
            field: self.arena.alloc_str(field),
        })
    }

    /// Subscript access `value[index]`.
    pub fn index(
        &self,
        value: &'arena Node<'arena>,
        index: &'arena Node<'arena>,
    ) -> &'arena Node<'arena> {
        self.alloc(Node::Index { value, index })
    }

    pub fn ident(&self, name: &str, ctx: IdentContext) -> &'arena Node<'arena> {
        self.alloc(Node::Ident {
            name: self.arena.alloc_str(name),
            ctx,
        })
    }

    /// An identifier read: `Ident` in `Load` context.
    pub fn load(&self, name: &str) -> &'arena Node<'arena> {
        self.ident(name, IdentContext::Load)
    }

    /// An identifier write: `Ident` in `Store` context.
    pub fn store(&self, name: &str) -> &'arena Node<'arena> {
        self.ident(name, IdentContext::Store)
    }

    pub fn constant(&self, value: Scalar<'arena>) -> &'arena Node<'arena> {
        self.alloc(Node::Constant(value))
    }

    pub fn int(&self, value: i64) -> &'arena Node<'arena> {
        self.constant(Scalar::Int(value))
    }

    pub fn float(&self, value: f64) -> &'arena Node<'arena> {
        self.constant(Scalar::Float(value))
    }

    pub fn bool(&self, value: bool) -> &'arena Node<'arena> {
        self.constant(Scalar::Bool(value))
    }

    pub fn string(&self, value: &str) -> &'arena Node<'arena> {
        self.constant(Scalar::Str(self.arena.alloc_str(value)))
    }

    /// The wildcard sentinel: an ordinary `Ident` named `_any_`, matching
    /// anything at its position when used inside a template.
    pub fn wildcard(&self) -> &'arena Node<'arena> {
        self.load("_any_")
    }
}
