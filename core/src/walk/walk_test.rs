//! Unit tests for the post-order graph walker.

use bumpalo::Bump;
use pretty_assertions::assert_eq;

use crate::node::{builder::NodeBuilder, BinaryOp, Node, NodeKind};
use crate::walk::{graph_walk, GraphWalker};

/// test(np.random.randn(10, 11))
fn sample_module<'arena>(b: &NodeBuilder<'arena>) -> &'arena Node<'arena> {
    b.module(&[b.expr_stmt(b.call(
        b.load("test"),
        &[b.call(
            b.field(b.field(b.load("np"), "random"), "randn"),
            &[b.int(10), b.int(11)],
            &[],
        )],
        &[],
    ))])
}

/// Reference reachability: every node under (and excluding) `root`.
fn reachable<'arena>(root: &Node<'arena>) -> Vec<&'arena Node<'arena>> {
    let mut out = Vec::new();
    let mut pending: Vec<&'arena Node<'arena>> =
        root.children().into_iter().map(|(n, _, _)| n).collect();
    while let Some(node) = pending.pop() {
        out.push(node);
        pending.extend(node.children().into_iter().map(|(n, _, _)| n));
    }
    out
}

#[test]
fn test_post_order_kind_sequence() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);
    let module = sample_module(&b);

    let kinds: Vec<_> = graph_walk(module).map(|item| item.node.kind()).collect();
    // Leaves strictly before their ancestors, stable order.
    assert_eq!(
        kinds,
        vec![
            NodeKind::Ident,    // test
            NodeKind::Ident,    // np
            NodeKind::Field,    // np.random
            NodeKind::Field,    // np.random.randn
            NodeKind::Constant, // 10
            NodeKind::Constant, // 11
            NodeKind::Call,     // np.random.randn(10, 11)
            NodeKind::Call,     // test(...)
            NodeKind::ExprStmt,
        ]
    );
}

#[test]
fn test_walk_completeness() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);
    let module = sample_module(&b);

    let mut walked: Vec<*const Node> = graph_walk(module).map(|i| i.node.as_ptr()).collect();
    let mut expected: Vec<*const Node> = reachable(module).iter().map(|n| n.as_ptr()).collect();
    walked.sort();
    expected.sort();
    assert_eq!(walked, expected);
}

#[test]
fn test_determinism_across_identical_trees() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    let one = sample_module(&b);
    let two = sample_module(&b);

    let kinds_one: Vec<_> = graph_walk(one).map(|i| i.node.kind()).collect();
    let kinds_two: Vec<_> = graph_walk(two).map(|i| i.node.kind()).collect();
    assert_eq!(kinds_one, kinds_two);
}

#[test]
fn test_depth_starts_at_zero_below_root() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    // a + (b + c) wrapped in a statement.
    let inner = b.binary(BinaryOp::Add, b.load("b"), b.load("c"));
    let expr = b.binary(BinaryOp::Add, b.load("a"), inner);
    let module = b.module(&[b.expr_stmt(expr)]);

    let depths: Vec<_> = graph_walk(module)
        .map(|item| (item.node.kind(), item.depth))
        .collect();
    assert_eq!(
        depths,
        vec![
            (NodeKind::Ident, 2),    // a
            (NodeKind::Ident, 3),    // b
            (NodeKind::Ident, 3),    // c
            (NodeKind::Binary, 2),   // b + c
            (NodeKind::Binary, 1),   // a + (b + c)
            (NodeKind::ExprStmt, 0), // the top-level statement
        ]
    );
}

#[test]
fn test_locations() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    let value = b.load("frank");
    let target = b.store("bob");
    let assign = b.assign(&[target], value);
    let module = b.module(&[assign]);

    let items: Vec<_> = graph_walk(module).collect();

    let target_item = items
        .iter()
        .find(|i| core::ptr::eq(i.node, target))
        .unwrap();
    assert!(core::ptr::eq(target_item.location.parent.unwrap(), assign));
    assert_eq!(target_item.location.field_name, "targets");
    assert_eq!(target_item.location.field_index, Some(0));

    let value_item = items.iter().find(|i| core::ptr::eq(i.node, value)).unwrap();
    assert_eq!(value_item.location.field_name, "value");
    assert_eq!(value_item.location.field_index, None);

    let assign_item = items
        .iter()
        .find(|i| core::ptr::eq(i.node, assign))
        .unwrap();
    assert!(core::ptr::eq(assign_item.location.parent.unwrap(), module));
    assert_eq!(assign_item.location.field_name, "body");
    assert_eq!(assign_item.location.field_index, Some(0));

    // Locations are identity-keyed snapshots: a second walk of the same
    // tree lands on equal locations.
    let again: Vec<_> = graph_walk(module).collect();
    let target_again = again
        .iter()
        .find(|i| core::ptr::eq(i.node, target))
        .unwrap();
    assert_eq!(target_item.location, target_again.location);
}

#[test]
fn test_statement_tracking() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    let first = b.expr_stmt(b.call(b.load("first_line"), &[], &[]));
    let second = b.assign(&[b.store("bob")], b.load("frank"));
    let module = b.module(&[first, second]);

    for item in graph_walk(module) {
        let statement = item.statement.unwrap();
        // Everything under the first statement reports it, and likewise for
        // the second; the statements report themselves.
        let under_first = core::ptr::eq(statement, first);
        let under_second = core::ptr::eq(statement, second);
        assert!(under_first || under_second);
    }

    // An expression root has no enclosing statement.
    let expr = b.binary(BinaryOp::Add, b.load("a"), b.load("b"));
    for item in graph_walk(expr) {
        assert!(item.statement.is_none());
    }
}

#[test]
fn test_root_is_not_emitted() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    let expr = b.binary(BinaryOp::Add, b.load("a"), b.load("b"));
    let nodes: Vec<_> = graph_walk(expr).map(|i| i.node.as_ptr()).collect();
    assert!(!nodes.contains(&expr.as_ptr()));
    assert_eq!(nodes.len(), 2);
}

#[test]
fn test_walker_is_one_shot() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);
    let module = sample_module(&b);

    let walker = GraphWalker::new(module);
    let first = walker.process().unwrap();
    assert!(first.count() > 0);

    let second = walker.process();
    assert!(matches!(second, Err(crate::errors::Error::AlreadyConsumed)));
}
