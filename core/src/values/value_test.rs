//! Unit tests for dynamic values and environments.

use bumpalo::Bump;
use pretty_assertions::assert_eq;

use crate::values::{values_equal, Column, Environment, Value};

#[test]
fn test_primitive_equality() {
    assert!(values_equal(&Value::Int(42), &Value::Int(42)));
    assert!(!values_equal(&Value::Int(42), &Value::Int(43)));
    assert!(values_equal(&Value::Bool(true), &Value::Bool(true)));
    assert!(values_equal(&Value::Str("bob"), &Value::Str("bob")));
    assert!(!values_equal(&Value::Str("bob"), &Value::Str("frank")));
    // Kind-mismatched values are simply unequal.
    assert!(!values_equal(&Value::Str("1"), &Value::Int(1)));
}

#[test]
fn test_numeric_cross_kind_equality() {
    assert!(values_equal(&Value::Int(1), &Value::Float(1.0)));
    assert!(values_equal(&Value::Float(2.0), &Value::Int(2)));
    assert!(!values_equal(&Value::Int(1), &Value::Float(1.5)));
    // NaN equals nothing, itself included.
    assert!(!values_equal(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
}

#[test]
fn test_array_equality_is_element_wise() {
    let arena = Bump::new();

    let a = Value::Array(arena.alloc_slice_copy(&[Value::Int(1), Value::Int(2)]));
    let b = Value::Array(arena.alloc_slice_copy(&[Value::Int(1), Value::Float(2.0)]));
    let c = Value::Array(arena.alloc_slice_copy(&[Value::Int(1)]));
    let d = Value::Array(arena.alloc_slice_copy(&[Value::Int(1), Value::Int(3)]));

    assert!(values_equal(&a, &b));
    assert!(!values_equal(&a, &c));
    assert!(!values_equal(&a, &d));
}

#[test]
fn test_table_equality_is_column_wise() {
    let arena = Bump::new();

    let ones: &[Value] = arena.alloc_slice_copy(&[Value::Int(1), Value::Int(2)]);
    let twos: &[Value] = arena.alloc_slice_copy(&[Value::Int(3), Value::Int(4)]);

    let table = Value::Table(arena.alloc_slice_copy(&[
        Column {
            name: "a",
            values: ones,
        },
        Column {
            name: "b",
            values: twos,
        },
    ]));
    let same = Value::Table(arena.alloc_slice_copy(&[
        Column {
            name: "a",
            values: arena.alloc_slice_copy(&[Value::Int(1), Value::Int(2)]),
        },
        Column {
            name: "b",
            values: arena.alloc_slice_copy(&[Value::Int(3), Value::Int(4)]),
        },
    ]));
    let renamed = Value::Table(arena.alloc_slice_copy(&[
        Column {
            name: "a",
            values: ones,
        },
        Column {
            name: "c",
            values: twos,
        },
    ]));
    let shorter = Value::Table(arena.alloc_slice_copy(&[Column {
        name: "a",
        values: ones,
    }]));

    assert!(values_equal(&table, &same));
    assert!(!values_equal(&table, &renamed));
    assert!(!values_equal(&table, &shorter));
}

#[test]
fn test_opaque_values_never_compare_equal() {
    // If equality cannot be evaluated, the answer is "not equal", even for
    // the same tag.
    assert!(!values_equal(&Value::Opaque("pd"), &Value::Opaque("pd")));
    assert!(!values_equal(&Value::Opaque("pd"), &Value::Int(1)));
    assert!(!values_equal(&Value::Int(1), &Value::Opaque("pd")));
}

#[test]
fn test_environment_lookup() {
    let arena = Bump::new();
    let mut env = Environment::new(&arena);
    assert!(env.is_empty());

    env.bind("a", Value::Int(1));
    env.bind("b", Value::Int(2));
    assert_eq!(env.len(), 2);

    assert!(matches!(env.lookup("a"), Some(Value::Int(1))));
    assert!(matches!(env.lookup("b"), Some(Value::Int(2))));
    assert!(env.lookup("missing").is_none());
}

#[test]
fn test_environment_shadowing() {
    let arena = Bump::new();
    let mut env = Environment::new(&arena);

    env.bind("a", Value::Int(1));
    env.bind("a", Value::Int(99));
    // Later bindings win.
    assert!(matches!(env.lookup("a"), Some(Value::Int(99))));
}
