//! Dynamic runtime values and binding environments.
//!
//! The containment search's context-sensitive mode accepts a match only if
//! the values bound to the paired identifier names compare equal. Values are
//! supplied by the caller per comparison; the core never owns them beyond the
//! arena they were built in.

pub mod environment;

pub use environment::Environment;

#[cfg(test)]
mod value_test;

use serde::Serialize;

/// A dynamic runtime value.
///
/// `Table` models column-oriented tabular data, the shape that gets
/// element-wise rather than identity comparison. `Opaque` is a host-side
/// value the core cannot inspect; its equality is never assumed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Value<'arena> {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(&'arena str),
    Array(&'arena [Value<'arena>]),
    Table(&'arena [Column<'arena>]),
    /// A host value whose equality cannot be evaluated here. The tag is for
    /// diagnostics only and never participates in comparison.
    Opaque(&'arena str),
}

/// One named column of a [`Value::Table`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Column<'arena> {
    pub name: &'arena str,
    pub values: &'arena [Value<'arena>],
}

/// Value equality as used by context-sensitive matching.
///
/// Arrays compare element-wise, tables column-wise (names and elements),
/// integers and floats compare numerically across the two kinds, and an
/// `Opaque` value is never equal to anything, itself included: if equality
/// cannot be evaluated the answer is "not equal". That conservative fallback
/// produces false negatives for exotic values by design; callers who need
/// better must supply comparable values.
pub fn values_equal(a: &Value<'_>, b: &Value<'_>) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(u, v)| values_equal(u, v))
        }
        (Value::Table(x), Value::Table(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|(cx, cy)| {
                    cx.name == cy.name
                        && cx.values.len() == cy.values.len()
                        && cx.values
                            .iter()
                            .zip(cy.values.iter())
                            .all(|(u, v)| values_equal(u, v))
                })
        }
        (Value::Opaque(_), _) | (_, Value::Opaque(_)) => false,
        _ => false,
    }
}
