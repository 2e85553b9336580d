//! Unit tests for the tree model.

use bumpalo::Bump;
use pretty_assertions::assert_eq;

use crate::node::{
    builder::NodeBuilder, dump, BinaryOp, FieldValue, IdentContext, Node, NodeKind, Scalar,
};

#[test]
fn test_fields_flatten_sequences() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    // test_call(bob, whee=1)
    let call = b.call(
        b.load("test_call"),
        &[b.load("bob")],
        &[b.keyword(Some("whee"), b.int(1))],
    );

    let entries = call.fields();
    let names: Vec<_> = entries.iter().map(|e| (e.name, e.index)).collect();
    assert_eq!(
        names,
        vec![
            ("callable", None),
            ("args", Some(0)),
            ("kwargs", Some(0)),
        ]
    );
}

#[test]
fn test_fields_preserve_element_order() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    let module = b.module(&[
        b.expr_stmt(b.load("first")),
        b.expr_stmt(b.load("second")),
        b.expr_stmt(b.load("third")),
    ]);

    let indices: Vec<_> = module.fields().iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn test_optional_field_enumerates_as_none_scalar() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    let block = b.block(b.load("guard"), None, &[b.expr_stmt(b.int(1))]);
    assert_eq!(
        block.field_at("binding", None),
        Some(FieldValue::Scalar(Scalar::None))
    );

    let bound = b.block(b.load("guard"), Some(b.store("g")), &[]);
    match bound.field_at("binding", None) {
        Some(FieldValue::Node(Node::Ident { name, .. })) => assert_eq!(*name, "g"),
        other => panic!("expected binding node, got {other:?}"),
    }
}

#[test]
fn test_field_at_misses() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    let call = b.call(b.load("f"), &[b.load("x")], &[]);

    // Unknown field name.
    assert_eq!(call.field_at("nope", None), None);
    // Sequence field does not answer to a singular fetch.
    assert_eq!(call.field_at("args", None), None);
    // Index out of range.
    assert_eq!(call.field_at("args", Some(1)), None);
    // Singular field does not answer to an indexed fetch.
    assert_eq!(call.field_at("callable", Some(0)), None);
}

#[test]
fn test_operators_surface_as_scalars() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    let expr = b.binary(BinaryOp::BitOr, b.load("dale"), b.int(123));
    assert_eq!(
        expr.field_at("op", None),
        Some(FieldValue::Scalar(Scalar::Str("|")))
    );

    let ident = b.load("dale");
    assert_eq!(
        ident.field_at("ctx", None),
        Some(FieldValue::Scalar(Scalar::Str("load")))
    );
}

#[test]
fn test_structural_equality_is_deep() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    let one = b.binary(BinaryOp::Add, b.load("a"), b.int(1));
    let two = b.binary(BinaryOp::Add, b.load("a"), b.int(1));
    let other = b.binary(BinaryOp::Add, b.load("a"), b.int(2));

    // Distinct allocations, equal structure.
    assert!(!core::ptr::eq(one, two));
    assert_eq!(one, two);
    assert_ne!(one, other);
}

#[test]
fn test_kind_names() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    assert_eq!(b.load("x").kind(), NodeKind::Ident);
    assert_eq!(b.int(1).kind(), NodeKind::Constant);
    assert_eq!(NodeKind::ExprStmt.name(), "ExprStmt");
    assert_eq!(format!("{}", NodeKind::Block), "Block");
}

#[test]
fn test_children_skip_scalars() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    // value.field has one child node and one scalar field.
    let access = b.field(b.load("value"), "attr");
    let children: Vec<_> = access
        .children()
        .into_iter()
        .map(|(_, name, _)| name)
        .collect();
    assert_eq!(children, vec!["value"]);
}

#[test]
fn test_ident_context_distinguishes_reads_from_writes() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    assert_ne!(b.load("x"), b.store("x"));
    assert_eq!(
        b.ident("x", IdentContext::Load),
        b.load("x")
    );
}

#[test]
fn test_dump_shape() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    // bob = frank
    let tree = b.module(&[b.assign(&[b.store("bob")], b.load("frank"))]);
    let rendered = dump::dump(tree);

    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(lines[0], "Module");
    assert_eq!(lines[1], "  body[0] = Assign");
    assert_eq!(lines[2], "    targets[0] = Ident(bob)");
    assert_eq!(lines[3], "    value = Ident(frank)");
}
