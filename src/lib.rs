//! Sylva - generic tooling for querying and rewriting syntax trees
//!
//! # Overview
//!
//! Sylva is a library for working with program syntax trees independently of
//! where they came from: a structural pattern matcher with wildcard
//! sentinels, a location-aware post-order tree walker, a subtree-containment
//! search, and a bottom-up rewriting engine, all sharing one arena-allocated
//! tree model. Common use cases include:
//!
//! - Locating every occurrence of an expression shape inside a larger tree
//! - Deciding whether two code fragments are the same up to renamed reads
//! - Rewriting or deleting nodes wholesale, leaves first
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use sylva::{contains, MatchOptions, NodeBuilder};
//!
//! let arena = Bump::new();
//! let b = NodeBuilder::new(&arena);
//!
//! // Host tree: meta[dale] + 1
//! use sylva::BinaryOp;
//! let host = b.binary(
//!     BinaryOp::Add,
//!     b.index(b.load("meta"), b.load("dale")),
//!     b.int(1),
//! );
//!
//! // Template: meta[_any_] -- the wildcard absorbs any index expression.
//! let template = b.index(b.load("meta"), b.wildcard());
//!
//! let hits: Vec<_> = contains(host, template, MatchOptions::default())
//!     .unwrap()
//!     .collect();
//! assert_eq!(hits.len(), 1);
//! ```
//!
//! # Rewriting
//!
//! ```
//! use bumpalo::Bump;
//! use sylva::{transform, Node, NodeBuilder, Rewrite, Visitor, WalkItem};
//!
//! // Rewrite every identifier `x` into `data["x"]`.
//! struct DataRenamer<'arena> {
//!     b: NodeBuilder<'arena>,
//! }
//!
//! impl<'arena> Visitor<'arena> for DataRenamer<'arena> {
//!     fn visit_ident(
//!         &mut self,
//!         node: &'arena Node<'arena>,
//!         _item: &WalkItem<'arena>,
//!     ) -> Rewrite<'arena> {
//!         let Node::Ident { name, .. } = node else {
//!             return Rewrite::Keep;
//!         };
//!         Rewrite::Replace(self.b.index(self.b.load("data"), self.b.string(name)))
//!     }
//! }
//!
//! let arena = Bump::new();
//! let b = NodeBuilder::new(&arena);
//!
//! // bob = frank
//! let tree = b.module(&[b.assign(&[b.store("bob")], b.load("frank"))]);
//!
//! let rewritten = transform(&arena, tree, &mut DataRenamer { b }).unwrap();
//! assert_ne!(rewritten, tree);
//! ```

// Re-export public API from sylva_core
pub use sylva_core::errors::Error;
pub use sylva_core::matcher::{is_wildcard_node, MatchOptions, Matcher};
pub use sylva_core::node::{
    builder::NodeBuilder, dump::dump, BinaryOp, FieldEntry, FieldValue, IdentContext, Node,
    NodeKind, Scalar, UnaryOp,
};
pub use sylva_core::search::{as_expression, contains, context_subset, ContextMatches, Occurrences};
pub use sylva_core::transform::{transform, Lookup, Rewrite, SubstitutionTable, Visitor};
pub use sylva_core::values::{values_equal, Column, Environment, Value};
pub use sylva_core::walk::{graph_walk, GraphWalker, Location, Walk, WalkItem};
