//! Post-order, location-aware tree traversal.
//!
//! The walk yields every composite node *below* the root, leaves before their
//! ancestors, together with the node's parent/field/index, its nesting depth,
//! and the top-level statement it descends from (when the root is a
//! [`Node::Module`]). The bottom-up transform engine is only well-defined
//! because of this post-order contract.
//!
//! The traversal is an explicit-stack iterator: lazy, suspendable between
//! items, and not restartable once exhausted.

#[cfg(test)]
mod walk_test;

use core::cell::Cell;

use smallvec::SmallVec;

use crate::errors::Error;
use crate::node::Node;

/// Where a node sits inside its parent. `field_index` is `None` when the
/// field is singular, otherwise the position within that field's sequence.
///
/// Locations are immutable snapshots, compared and hashed by the *identity*
/// of the parent plus the `(field_name, field_index)` slot: two structurally
/// identical parents at different addresses give different locations.
#[derive(Debug, Clone, Copy)]
pub struct Location<'arena> {
    pub parent: Option<&'arena Node<'arena>>,
    pub field_name: &'static str,
    pub field_index: Option<usize>,
}

impl<'arena> PartialEq for Location<'arena> {
    fn eq(&self, other: &Self) -> bool {
        let same_parent = match (self.parent, other.parent) {
            (Some(a), Some(b)) => core::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_parent && self.field_name == other.field_name && self.field_index == other.field_index
    }
}

impl<'arena> Eq for Location<'arena> {}

impl<'arena> core::hash::Hash for Location<'arena> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        if let Some(parent) = self.parent {
            core::ptr::hash(parent, state);
        }
        self.field_name.hash(state);
        self.field_index.hash(state);
    }
}

/// One traversal item. Ephemeral: owned by the walk's caller, meaningful for
/// the duration of one traversal.
#[derive(Debug, Clone, Copy)]
pub struct WalkItem<'arena> {
    pub node: &'arena Node<'arena>,
    /// 0 for the first composite node below the root, +1 per descent.
    pub depth: usize,
    pub location: Location<'arena>,
    /// The enclosing top-level statement under a `Module` root; `None` for
    /// other roots. Diagnostic context, never matching logic.
    pub statement: Option<&'arena Node<'arena>>,
}

/// One-shot handle around a traversal.
///
/// [`GraphWalker::process`] hands out the underlying iterator exactly once;
/// asking again is a programmer error surfaced as [`Error::AlreadyConsumed`].
#[derive(Debug)]
pub struct GraphWalker<'arena> {
    root: &'arena Node<'arena>,
    processed: Cell<bool>,
}

impl<'arena> GraphWalker<'arena> {
    pub fn new(root: &'arena Node<'arena>) -> Self {
        Self {
            root,
            processed: Cell::new(false),
        }
    }

    pub fn process(&self) -> Result<Walk<'arena>, Error> {
        if self.processed.replace(true) {
            return Err(Error::AlreadyConsumed);
        }
        Ok(Walk::new(self.root))
    }
}

/// Walk `root` without the one-shot bookkeeping.
pub fn graph_walk<'arena>(root: &'arena Node<'arena>) -> Walk<'arena> {
    Walk::new(root)
}

#[derive(Debug, Clone, Copy)]
struct Top<'arena> {
    node: &'arena Node<'arena>,
    location: Location<'arena>,
    statement: Option<&'arena Node<'arena>>,
}

#[derive(Debug)]
struct Frame<'arena> {
    node: &'arena Node<'arena>,
    children: SmallVec<[(&'arena Node<'arena>, &'static str, Option<usize>); 8]>,
    next_child: usize,
    depth: usize,
    location: Location<'arena>,
    statement: Option<&'arena Node<'arena>>,
}

impl<'arena> Frame<'arena> {
    fn new(
        node: &'arena Node<'arena>,
        depth: usize,
        location: Location<'arena>,
        statement: Option<&'arena Node<'arena>>,
    ) -> Self {
        Self {
            node,
            children: node.children(),
            next_child: 0,
            depth,
            location,
            statement,
        }
    }
}

/// The post-order traversal iterator.
#[derive(Debug)]
pub struct Walk<'arena> {
    tops: SmallVec<[Top<'arena>; 4]>,
    next_top: usize,
    stack: Vec<Frame<'arena>>,
}

impl<'arena> Walk<'arena> {
    fn new(root: &'arena Node<'arena>) -> Self {
        // The root itself is never emitted. Under a Module each top-level
        // statement is a traversal top carrying itself as `statement`; under
        // any other root the root's composite children are the tops.
        let tops = match root {
            Node::Module { body } => body
                .iter()
                .enumerate()
                .map(|(i, &stmt)| Top {
                    node: stmt,
                    location: Location {
                        parent: Some(root),
                        field_name: "body",
                        field_index: Some(i),
                    },
                    statement: Some(stmt),
                })
                .collect(),
            _ => root
                .children()
                .into_iter()
                .map(|(child, name, index)| Top {
                    node: child,
                    location: Location {
                        parent: Some(root),
                        field_name: name,
                        field_index: index,
                    },
                    statement: None,
                })
                .collect(),
        };
        Self {
            tops,
            next_top: 0,
            stack: Vec::new(),
        }
    }
}

impl<'arena> Iterator for Walk<'arena> {
    type Item = WalkItem<'arena>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.last_mut() {
                None => {
                    // Start the next traversal top, or end the walk.
                    let top = *self.tops.get(self.next_top)?;
                    self.next_top += 1;
                    self.stack
                        .push(Frame::new(top.node, 0, top.location, top.statement));
                }
                Some(frame) if frame.next_child < frame.children.len() => {
                    let (child, name, index) = frame.children[frame.next_child];
                    frame.next_child += 1;
                    let parent = frame.node;
                    let depth = frame.depth + 1;
                    let statement = frame.statement;
                    self.stack.push(Frame::new(
                        child,
                        depth,
                        Location {
                            parent: Some(parent),
                            field_name: name,
                            field_index: index,
                        },
                        statement,
                    ));
                }
                Some(_) => {
                    // All children emitted: the frame's own node comes last.
                    let done = self.stack.pop()?;
                    tracing::trace!(kind = %done.node.kind(), depth = done.depth, "walk item");
                    return Some(WalkItem {
                        node: done.node,
                        depth: done.depth,
                        location: done.location,
                        statement: done.statement,
                    });
                }
            }
        }
    }
}
