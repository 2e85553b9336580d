//! Containment search: find every place a fragment occurs inside a host
//! tree.
//!
//! The fragment is used as a matcher template, so wildcards keep their
//! meaning, and two looseness knobs combine: plain structural containment,
//! and name-oblivious containment where identifier reads match by position
//! rather than spelling. On top of those, [`context_subset`] accepts a match
//! only when the runtime values bound to the paired identifier names compare
//! equal in two caller-supplied environments.
//!
//! Results are lazy and finite: one [`WalkItem`] per match site, driving a
//! single underlying walk of the host. An exhausted sequence stays exhausted.


use crate::errors::Error;
use crate::matcher::{MatchOptions, Matcher};
use crate::node::{IdentContext, Node};
use crate::values::{values_equal, Environment};
use crate::walk::{graph_walk, Walk, WalkItem};

/// Reduce `node` to a single expression: a `Module` holding exactly one
/// expression statement, a bare expression statement, or an expression node.
/// Anything else (an assignment, a block, a multi-statement module) fails
/// with [`Error::NotAnExpression`].
pub fn as_expression<'arena>(node: &'arena Node<'arena>) -> Result<&'arena Node<'arena>, Error> {
    match node {
        Node::Module { body } if body.len() == 1 => as_expression(body[0]),
        Node::ExprStmt { value } => Ok(*value),
        Node::Module { .. } | Node::Assign { .. } | Node::Block { .. } => {
            Err(Error::NotAnExpression { kind: node.kind() })
        }
        other => Ok(other),
    }
}

/// Enumerate every node of `host` that `fragment` matches.
///
/// The fragment must reduce to a single expression. Repeated sub-expressions
/// each produce a separate hit; the search never short-circuits after the
/// first. Candidate nodes are compared as-is (no statement unwrapping), so a
/// site is reported at most once.
pub fn contains<'arena>(
    host: &'arena Node<'arena>,
    fragment: &'arena Node<'arena>,
    options: MatchOptions,
) -> Result<Occurrences<'arena>, Error> {
    let fragment = as_expression(fragment)?;
    let matcher = Matcher::with_options(fragment, options);
    // A bare identifier-read fragment under name-oblivious comparison is
    // total: every walked node is a hit. Looseness inherited from the
    // top-level wildcard rule, kept deliberately.
    let trivial = options.ignore_load_names && matcher.is_bare_load_ident();
    tracing::debug!(
        fragment = %matcher.template().kind(),
        host = %host.kind(),
        trivial,
        "containment search"
    );
    Ok(Occurrences {
        walk: graph_walk(host),
        matcher,
        trivial,
    })
}

/// Lazy sequence of match sites produced by [`contains`].
#[derive(Debug)]
pub struct Occurrences<'arena> {
    walk: Walk<'arena>,
    matcher: Matcher<'arena>,
    trivial: bool,
}

impl<'arena> Occurrences<'arena> {
    pub(crate) fn matcher(&self) -> &Matcher<'arena> {
        &self.matcher
    }
}

impl<'arena> Iterator for Occurrences<'arena> {
    type Item = WalkItem<'arena>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.walk.next()?;
            if self.trivial || self.matcher.matches_site(item.node) {
                tracing::trace!(site = %item.node.kind(), depth = item.depth, "occurrence");
                return Some(item);
            }
        }
    }
}

/// Context-sensitive subset matching: structural occurrences of `fragment`
/// in `host` filtered down to those whose identifier reads are bound to the
/// same runtime values as the fragment's, pairwise.
///
/// The identifier sequences of fragment and candidate align positionally by
/// virtue of the synchronized structural match; a site whose sequence length
/// differs (possible when the fragment contains wildcards) is rejected, as is
/// any pair with an unbound name or values that do not compare equal under
/// [`values_equal`].
pub fn context_subset<'arena, 'env>(
    host: &'arena Node<'arena>,
    host_env: &'env Environment<'arena>,
    fragment: &'arena Node<'arena>,
    fragment_env: &'env Environment<'arena>,
    options: MatchOptions,
) -> Result<ContextMatches<'arena, 'env>, Error> {
    let occurrences = contains(host, fragment, options)?;
    let fragment_names = load_names(occurrences.matcher().template());
    Ok(ContextMatches {
        occurrences,
        fragment_names,
        host_env,
        fragment_env,
    })
}

/// Lazy sequence of value-verified match sites produced by
/// [`context_subset`].
#[derive(Debug)]
pub struct ContextMatches<'arena, 'env> {
    occurrences: Occurrences<'arena>,
    fragment_names: Vec<&'arena str>,
    host_env: &'env Environment<'arena>,
    fragment_env: &'env Environment<'arena>,
}

impl<'arena, 'env> Iterator for ContextMatches<'arena, 'env> {
    type Item = WalkItem<'arena>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.occurrences.next()?;
            let candidate_names = load_names(item.node);
            if candidate_names.len() != self.fragment_names.len() {
                continue;
            }
            let bound_equal = self
                .fragment_names
                .iter()
                .zip(candidate_names.iter())
                .all(|(fragment_name, candidate_name)| {
                    match (
                        self.fragment_env.lookup(fragment_name),
                        self.host_env.lookup(candidate_name),
                    ) {
                        (Some(fragment_value), Some(candidate_value)) => {
                            values_equal(fragment_value, candidate_value)
                        }
                        // An unbound name cannot be compared; not equal.
                        _ => false,
                    }
                });
            if bound_equal {
                tracing::trace!(site = %item.node.kind(), "context match");
                return Some(item);
            }
        }
    }
}

/// The identifier reads of `node`'s subtree, in traversal order.
pub fn load_names<'arena>(node: &Node<'arena>) -> Vec<&'arena str> {
    let mut out = Vec::new();
    collect_load_names(node, &mut out);
    out
}

fn collect_load_names<'arena>(node: &Node<'arena>, out: &mut Vec<&'arena str>) {
    if let Node::Ident {
        name,
        ctx: IdentContext::Load,
    } = node
    {
        out.push(*name);
    }
    for (child, _, _) in node.children() {
        collect_load_names(child, out);
    }
}
