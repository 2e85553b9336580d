use thiserror::Error;

use crate::node::NodeKind;

/// Errors surfaced by the walker, the containment search, and the transform
/// engine. None of these are retried anywhere: each one is either a caller
/// bug or a definitive "this input cannot be processed".
#[derive(Debug, Error)]
pub enum Error {
    /// A one-shot [`GraphWalker`](crate::walk::GraphWalker) was asked to
    /// produce a second traversal.
    #[error("graph walker has already been consumed")]
    AlreadyConsumed,

    /// A containment-search fragment did not reduce to a single expression.
    #[error("fragment must reduce to a single expression, got {kind}")]
    NotAnExpression { kind: NodeKind },

    /// The transform engine was asked to rebuild a node into a shape the
    /// tree model cannot represent, e.g. deleting the child of a required
    /// singular field.
    #[error("malformed tree: {detail}")]
    MalformedTree { detail: String },
}
