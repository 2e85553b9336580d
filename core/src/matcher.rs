//! Structural matching of a candidate tree against a template tree.
//!
//! Templates are ordinary trees that may contain wildcard sentinels: a
//! string scalar equal to `"<any>"` or `"_any_"`, or an identifier named
//! `_any_`. A wildcard suppresses comparison of whatever sits at its
//! position; kind-specific rules let a wildcard consume an entire field
//! (a call's argument list, a block's body) rather than being compared
//! slot-by-slot. The recursive skip/compare mechanics are shared; each kind
//! rule only decides which fields to skip.


use smallvec::SmallVec;

use crate::node::{FieldValue, IdentContext, Node, Scalar};

/// Reserved wildcard spellings. Checking against these is the one shared
/// predicate used by both the matcher and the containment search.
const WILDCARD_NAMES: [&str; 2] = ["<any>", "_any_"];

pub fn is_wildcard_name(name: &str) -> bool {
    WILDCARD_NAMES.contains(&name)
}

pub fn is_wildcard_scalar(value: &Scalar<'_>) -> bool {
    matches!(value, Scalar::Str(s) if is_wildcard_name(s))
}

/// A node-shaped wildcard: an `_any_` identifier, or a constant holding a
/// wildcard string.
pub fn is_wildcard_node(node: &Node<'_>) -> bool {
    match node {
        Node::Ident { name, .. } => is_wildcard_name(name),
        Node::Constant(value) => is_wildcard_scalar(value),
        _ => false,
    }
}

/// Knobs for how loosely the matcher compares trees.
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    /// Treat any two `Load`-context identifiers as matching regardless of
    /// their literal names. Only reads are ignored; written names and other
    /// scalars still compare. Position, not name, is what aligns them.
    ///
    /// Default: `false`.
    pub ignore_load_names: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ignore_load_names: false,
        }
    }
}

/// Compares candidate trees against one template tree.
///
/// Matching is template-driven: the template's fields are enumerated and the
/// candidate must supply at least that shape at every non-wildcarded
/// position. Extra candidate sequence elements beyond the template's are not
/// compared.
#[derive(Debug)]
pub struct Matcher<'arena> {
    template: &'arena Node<'arena>,
    options: MatchOptions,
}

impl<'arena> Matcher<'arena> {
    pub fn new(template: &'arena Node<'arena>) -> Self {
        Self::with_options(template, MatchOptions::default())
    }

    pub fn with_options(template: &'arena Node<'arena>, options: MatchOptions) -> Self {
        // A template authored as a statement is really about its expression.
        let template = match template {
            Node::ExprStmt { value } => *value,
            other => other,
        };
        Self { template, options }
    }

    pub fn template(&self) -> &'arena Node<'arena> {
        self.template
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Does `candidate` structurally match the template? A candidate in
    /// statement position is unwrapped to its expression first.
    pub fn matches(&self, candidate: &Node<'arena>) -> bool {
        let candidate = match candidate {
            Node::ExprStmt { value } => *value,
            other => other,
        };
        self.match_node(self.template, candidate)
    }

    /// Like [`Matcher::matches`] but without the statement unwrap, so a
    /// traversal site is never reported against both a statement and the
    /// expression it wraps.
    pub(crate) fn matches_site(&self, candidate: &Node<'arena>) -> bool {
        self.match_node(self.template, candidate)
    }

    /// A template that is nothing but a bare identifier read. Under
    /// name-oblivious comparison such a template matches any candidate shape
    /// at all, mirroring a top-level `_any_`.
    pub(crate) fn is_bare_load_ident(&self) -> bool {
        matches!(
            self.template,
            Node::Ident {
                ctx: IdentContext::Load,
                ..
            }
        )
    }

    fn match_node(&self, template: &Node<'arena>, candidate: &Node<'arena>) -> bool {
        // An `_any_` template is total at its position: no kind check at
        // all, so a top-level wildcard whitelists any candidate shape.
        if is_wildcard_node(template) {
            tracing::trace!(candidate = %candidate.kind(), "wildcard template, match");
            return true;
        }

        if template.kind() != candidate.kind() {
            tracing::trace!(
                template = %template.kind(),
                candidate = %candidate.kind(),
                "kind mismatch"
            );
            return false;
        }

        let mut skip: SmallVec<[&'static str; 2]> = SmallVec::new();
        match template {
            // Wildcard attribute name or wildcard object skips that field.
            Node::Field { value, field } => {
                if is_wildcard_name(field) {
                    skip.push("field");
                }
                if is_wildcard_node(value) {
                    skip.push("value");
                }
            }
            // A call whose argument list is exactly `[_any_]` matches any
            // arguments and keywords, but the node must still be a call.
            Node::Call { args, .. } => {
                if args.len() == 1 && is_wildcard_node(args[0]) {
                    skip.push("args");
                    skip.push("kwargs");
                }
            }
            // A block whose body is a single wildcard statement matches any
            // body; the guard still compares.
            Node::Block { body, .. } => {
                if body.len() == 1 {
                    if let Node::ExprStmt { value } = body[0] {
                        if is_wildcard_node(value) {
                            skip.push("body");
                        }
                    }
                }
            }
            Node::Index { index, .. } => {
                if is_wildcard_node(index) {
                    skip.push("index");
                }
            }
            Node::Unary { operand, .. } => {
                if is_wildcard_node(operand) {
                    skip.push("operand");
                }
            }
            // Either operand may independently be a wildcard.
            Node::Binary { left, right, .. } => {
                if is_wildcard_node(left) {
                    skip.push("left");
                }
                if is_wildcard_node(right) {
                    skip.push("right");
                }
            }
            Node::Ident {
                ctx: IdentContext::Load,
                ..
            } if self.options.ignore_load_names => {
                // Name-oblivious mode: a read matches a read no matter the
                // spelling. Context still compares, so a write never matches.
                skip.push("name");
            }
            _ => {}
        }

        self.match_children(template, candidate, &skip)
    }

    /// Generic field-wise comparison. The candidate's entry is fetched even
    /// for skipped fields, so the candidate must have the template's shape
    /// everywhere; only the comparison itself is suppressed.
    fn match_children(
        &self,
        template: &Node<'arena>,
        candidate: &Node<'arena>,
        skip: &[&'static str],
    ) -> bool {
        for entry in template.fields() {
            let Some(other) = candidate.field_at(entry.name, entry.index) else {
                tracing::trace!(
                    template = %template.kind(),
                    field = entry.name,
                    index = ?entry.index,
                    "candidate lacks field"
                );
                return false;
            };

            if skip.contains(&entry.name) {
                continue;
            }

            let matched = self.match_field(entry.value, other);
            tracing::trace!(
                field = entry.name,
                index = ?entry.index,
                matched,
                "match field"
            );
            if !matched {
                return false;
            }
        }
        true
    }

    fn match_field(&self, template: FieldValue<'arena>, candidate: FieldValue<'arena>) -> bool {
        match (template, candidate) {
            // A wildcard entry absorbs whatever the candidate holds there,
            // scalar or subtree alike.
            (FieldValue::Scalar(s), _) if is_wildcard_scalar(&s) => true,
            (FieldValue::Node(n), _) if is_wildcard_node(n) => true,
            (FieldValue::Scalar(a), FieldValue::Scalar(b)) => a == b,
            (FieldValue::Node(a), FieldValue::Node(b)) => self.match_node(a, b),
            _ => false,
        }
    }
}

/// Matcher-vs-tree equality is defined as a successful match. The reverse
/// direction (tree-vs-matcher) holds by symmetry of the definition, not of
/// the comparison: `matches` stays template-driven.
impl<'arena> PartialEq<Node<'arena>> for Matcher<'arena> {
    fn eq(&self, other: &Node<'arena>) -> bool {
        self.matches(other)
    }
}

impl<'arena> PartialEq<Matcher<'arena>> for Node<'arena> {
    fn eq(&self, other: &Matcher<'arena>) -> bool {
        other.matches(self)
    }
}
