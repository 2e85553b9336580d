//! Core implementation of sylva: generic tooling for querying and rewriting
//! syntax trees.
//!
//! The pieces, leaves first:
//!
//! - [`node`] — the shared tree model: arena-allocated tagged nodes with
//!   named/indexed fields, plus programmatic construction and a structural
//!   dump.
//! - [`walk`] — deterministic post-order traversal yielding each node with
//!   its parent, field, index, and depth.
//! - [`matcher`] — structural template matching with wildcard sentinels.
//! - [`search`] — containment search: every embedding of a fragment in a
//!   host tree, optionally verified against runtime value bindings.
//! - [`transform`] — bottom-up rewriting with an identity-keyed
//!   substitution table.

pub mod errors;
pub mod matcher;
pub mod node;
pub mod search;
pub mod transform;
pub mod values;
pub mod walk;

pub use errors::Error;
pub use matcher::{MatchOptions, Matcher};
pub use node::{
    builder::NodeBuilder, BinaryOp, FieldEntry, FieldValue, IdentContext, Node, NodeKind, Scalar,
    UnaryOp,
};
pub use search::{as_expression, contains, context_subset, ContextMatches, Occurrences};
pub use transform::{transform, Lookup, Rewrite, SubstitutionTable, Visitor};
pub use values::{values_equal, Column, Environment, Value};
pub use walk::{graph_walk, GraphWalker, Location, Walk, WalkItem};
