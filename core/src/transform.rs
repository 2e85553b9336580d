//! Bottom-up tree rewriting.
//!
//! The engine visits every node exactly once, leaves before parents (the
//! walker's post-order contract is what makes this well-defined), and records
//! each node's outcome in an identity-keyed substitution table. A parent is
//! re-linked against that table only after all of its descendants have their
//! final identities, so replacements and deletions propagate upward
//! consistently.
//!
//! Nodes are immutable, so "the visitor edited the node itself" takes the
//! form of returning a rebuilt node: the engine still substitutes any
//! rewritten original children inside it, and leaves children the walker
//! never saw (freshly built by the visitor) untouched. That is the third
//! state of the table lookup: unseen is not the same as kept-unchanged.


use bumpalo::Bump;
use hashbrown::{DefaultHashBuilder, HashMap};
use smallvec::SmallVec;

use crate::errors::Error;
use crate::node::{Node, NodeKind};
use crate::walk::{graph_walk, WalkItem};

/// A visitor's verdict for one node.
#[derive(Debug, Clone, Copy)]
pub enum Rewrite<'arena> {
    /// Keep this node. Its children are still re-linked, so rewrites below
    /// it propagate.
    Keep,
    /// Substitute the given node at this position. Original children reused
    /// inside the replacement are re-linked; fresh ones are left as built.
    Replace(&'arena Node<'arena>),
    /// Remove this node: dropped from a sequence slot, cleared from an
    /// optional field. Deleting the child of a required singular field is a
    /// malformed tree.
    Delete,
}

/// Per-node-kind rewrite visitor.
///
/// `visit` dispatches on the node's kind to a kind-specific method, each of
/// which defaults to [`Visitor::visit_default`], which keeps the node. A
/// plain `FnMut(&Node, &WalkItem) -> Rewrite` closure is also a visitor.
pub trait Visitor<'arena> {
    fn visit(&mut self, node: &'arena Node<'arena>, item: &WalkItem<'arena>) -> Rewrite<'arena> {
        match node.kind() {
            NodeKind::Module => self.visit_module(node, item),
            NodeKind::Assign => self.visit_assign(node, item),
            NodeKind::ExprStmt => self.visit_expr_stmt(node, item),
            NodeKind::Block => self.visit_block(node, item),
            NodeKind::Binary => self.visit_binary(node, item),
            NodeKind::Unary => self.visit_unary(node, item),
            NodeKind::Call => self.visit_call(node, item),
            NodeKind::Keyword => self.visit_keyword(node, item),
            NodeKind::Field => self.visit_field(node, item),
            NodeKind::Index => self.visit_index(node, item),
            NodeKind::Ident => self.visit_ident(node, item),
            NodeKind::Constant => self.visit_constant(node, item),
        }
    }

    fn visit_module(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_assign(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_expr_stmt(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_block(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_binary(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_unary(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_call(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_keyword(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_field(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_index(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_ident(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_constant(
        &mut self,
        node: &'arena Node<'arena>,
        item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        self.visit_default(node, item)
    }

    fn visit_default(
        &mut self,
        _node: &'arena Node<'arena>,
        _item: &WalkItem<'arena>,
    ) -> Rewrite<'arena> {
        Rewrite::Keep
    }
}

impl<'arena, F> Visitor<'arena> for F
where
    F: FnMut(&'arena Node<'arena>, &WalkItem<'arena>) -> Rewrite<'arena>,
{
    fn visit(&mut self, node: &'arena Node<'arena>, item: &WalkItem<'arena>) -> Rewrite<'arena> {
        self(node, item)
    }
}

/// Result of looking a node up in the substitution table. Three states on
/// purpose: a node the walker never saw must not be conflated with a node
/// the visitor explicitly kept unchanged.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'arena> {
    Unseen,
    Replaced(&'arena Node<'arena>),
    Deleted,
}

/// Identity-keyed record of every visited node's rewrite outcome. Scoped to
/// exactly one transform call and allocated in the same arena as the tree.
pub struct SubstitutionTable<'arena> {
    entries: HashMap<*const Node<'arena>, Option<&'arena Node<'arena>>, DefaultHashBuilder, &'arena Bump>,
}

impl<'arena> SubstitutionTable<'arena> {
    fn new_in(arena: &'arena Bump) -> Self {
        Self {
            entries: HashMap::new_in(arena),
        }
    }

    fn record(&mut self, original: &Node<'arena>, outcome: Option<&'arena Node<'arena>>) {
        self.entries.insert(original.as_ptr(), outcome);
    }

    fn lookup(&self, node: &Node<'arena>) -> Lookup<'arena> {
        match self.entries.get(&node.as_ptr()).copied() {
            None => Lookup::Unseen,
            Some(Some(replacement)) => Lookup::Replaced(replacement),
            Some(None) => Lookup::Deleted,
        }
    }
}

/// Apply `visitor` to every node of `root` exactly once, bottom-up, and
/// return the rewritten tree.
///
/// The root itself is not visited (the walker yields only nodes below it)
/// but is re-linked at the end so rewrites of its immediate children stick.
/// A visitor panic propagates unchanged; there is no partial-rewrite
/// recovery, since a half-rewritten tree has no useful meaning.
pub fn transform<'arena, V>(
    arena: &'arena Bump,
    root: &'arena Node<'arena>,
    visitor: &mut V,
) -> Result<&'arena Node<'arena>, Error>
where
    V: Visitor<'arena> + ?Sized,
{
    let mut table = SubstitutionTable::new_in(arena);

    for item in graph_walk(root) {
        let node = item.node;
        let outcome = match visitor.visit(node, &item) {
            Rewrite::Keep => Some(relink(arena, node, &table)?),
            Rewrite::Replace(replacement) => Some(relink(arena, replacement, &table)?),
            Rewrite::Delete => None,
        };
        tracing::trace!(
            kind = %node.kind(),
            deleted = outcome.is_none(),
            "visited"
        );
        table.record(node, outcome);
    }

    relink(arena, root, &table)
}

/// Rebuild `node` with each child swapped for its final identity per the
/// table. Returns `node` itself when nothing underneath changed.
fn relink<'arena>(
    arena: &'arena Bump,
    node: &'arena Node<'arena>,
    table: &SubstitutionTable<'arena>,
) -> Result<&'arena Node<'arena>, Error> {
    match *node {
        Node::Module { body } => Ok(match relink_seq(arena, body, table) {
            Some(body) => arena.alloc(Node::Module { body }),
            None => node,
        }),
        Node::Assign { targets, value } => {
            let new_targets = relink_seq(arena, targets, table);
            let new_value = relink_required(value, table, "value", NodeKind::Assign)?;
            if new_targets.is_none() && core::ptr::eq(new_value, value) {
                Ok(node)
            } else {
                Ok(arena.alloc(Node::Assign {
                    targets: new_targets.unwrap_or(targets),
                    value: new_value,
                }))
            }
        }
        Node::ExprStmt { value } => {
            let new_value = relink_required(value, table, "value", NodeKind::ExprStmt)?;
            if core::ptr::eq(new_value, value) {
                Ok(node)
            } else {
                Ok(arena.alloc(Node::ExprStmt { value: new_value }))
            }
        }
        Node::Block {
            guard,
            binding,
            body,
        } => {
            let new_guard = relink_required(guard, table, "guard", NodeKind::Block)?;
            let new_binding = relink_optional(binding, table);
            let new_body = relink_seq(arena, body, table);
            if core::ptr::eq(new_guard, guard)
                && option_ptr_eq(new_binding, binding)
                && new_body.is_none()
            {
                Ok(node)
            } else {
                Ok(arena.alloc(Node::Block {
                    guard: new_guard,
                    binding: new_binding,
                    body: new_body.unwrap_or(body),
                }))
            }
        }
        Node::Binary { op, left, right } => {
            let new_left = relink_required(left, table, "left", NodeKind::Binary)?;
            let new_right = relink_required(right, table, "right", NodeKind::Binary)?;
            if core::ptr::eq(new_left, left) && core::ptr::eq(new_right, right) {
                Ok(node)
            } else {
                Ok(arena.alloc(Node::Binary {
                    op,
                    left: new_left,
                    right: new_right,
                }))
            }
        }
        Node::Unary { op, operand } => {
            let new_operand = relink_required(operand, table, "operand", NodeKind::Unary)?;
            if core::ptr::eq(new_operand, operand) {
                Ok(node)
            } else {
                Ok(arena.alloc(Node::Unary {
                    op,
                    operand: new_operand,
                }))
            }
        }
        Node::Call {
            callable,
            args,
            kwargs,
        } => {
            let new_callable = relink_required(callable, table, "callable", NodeKind::Call)?;
            let new_args = relink_seq(arena, args, table);
            let new_kwargs = relink_seq(arena, kwargs, table);
            if core::ptr::eq(new_callable, callable) && new_args.is_none() && new_kwargs.is_none()
            {
                Ok(node)
            } else {
                Ok(arena.alloc(Node::Call {
                    callable: new_callable,
                    args: new_args.unwrap_or(args),
                    kwargs: new_kwargs.unwrap_or(kwargs),
                }))
            }
        }
        Node::Keyword { name, value } => {
            let new_value = relink_required(value, table, "value", NodeKind::Keyword)?;
            if core::ptr::eq(new_value, value) {
                Ok(node)
            } else {
                Ok(arena.alloc(Node::Keyword {
                    name,
                    value: new_value,
                }))
            }
        }
        Node::Field { value, field } => {
            let new_value = relink_required(value, table, "value", NodeKind::Field)?;
            if core::ptr::eq(new_value, value) {
                Ok(node)
            } else {
                Ok(arena.alloc(Node::Field {
                    value: new_value,
                    field,
                }))
            }
        }
        Node::Index { value, index } => {
            let new_value = relink_required(value, table, "value", NodeKind::Index)?;
            let new_index = relink_required(index, table, "index", NodeKind::Index)?;
            if core::ptr::eq(new_value, value) && core::ptr::eq(new_index, index) {
                Ok(node)
            } else {
                Ok(arena.alloc(Node::Index {
                    value: new_value,
                    index: new_index,
                }))
            }
        }
        Node::Ident { .. } | Node::Constant(_) => Ok(node),
    }
}

fn resolve<'arena>(
    child: &'arena Node<'arena>,
    table: &SubstitutionTable<'arena>,
) -> Option<&'arena Node<'arena>> {
    match table.lookup(child) {
        // Never walked: a node the visitor spliced in. Leave it as built.
        Lookup::Unseen => Some(child),
        Lookup::Replaced(replacement) => Some(replacement),
        Lookup::Deleted => None,
    }
}

fn relink_required<'arena>(
    child: &'arena Node<'arena>,
    table: &SubstitutionTable<'arena>,
    field: &'static str,
    kind: NodeKind,
) -> Result<&'arena Node<'arena>, Error> {
    resolve(child, table).ok_or_else(|| Error::MalformedTree {
        detail: format!("cannot delete required field `{field}` of {kind}"),
    })
}

fn relink_optional<'arena>(
    child: Option<&'arena Node<'arena>>,
    table: &SubstitutionTable<'arena>,
) -> Option<&'arena Node<'arena>> {
    child.and_then(|c| resolve(c, table))
}

/// Re-link a sequence field. `None` means unchanged; `Some` is the rebuilt
/// slice with deleted slots removed and order preserved.
fn relink_seq<'arena>(
    arena: &'arena Bump,
    children: &'arena [&'arena Node<'arena>],
    table: &SubstitutionTable<'arena>,
) -> Option<&'arena [&'arena Node<'arena>]> {
    let mut changed = false;
    let mut out: SmallVec<[&'arena Node<'arena>; 8]> = SmallVec::new();
    for &child in children {
        match resolve(child, table) {
            Some(new_child) => {
                if !core::ptr::eq(new_child, child) {
                    changed = true;
                }
                out.push(new_child);
            }
            None => changed = true,
        }
    }
    changed.then(|| &*arena.alloc_slice_copy(&out))
}

fn option_ptr_eq(a: Option<&Node<'_>>, b: Option<&Node<'_>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => core::ptr::eq(x, y),
        _ => false,
    }
}
