//! Smoke test for the facade crate: the re-exported API is enough to build
//! a tree, query it, and rewrite it.

use bumpalo::Bump;
use pretty_assertions::assert_eq;

use sylva::{
    contains, transform, BinaryOp, MatchOptions, Node, NodeBuilder, Rewrite, Visitor, WalkItem,
};

#[test]
fn test_query_then_rewrite() {
    let arena = Bump::new();
    let b = NodeBuilder::new(&arena);

    // total = price + price
    let module = b.module(&[b.assign(
        &[b.store("total")],
        b.binary(BinaryOp::Add, b.load("price"), b.load("price")),
    )]);

    let hits = contains(module, b.load("price"), MatchOptions::default())
        .unwrap()
        .count();
    assert_eq!(hits, 2);

    struct Doubler<'arena> {
        b: NodeBuilder<'arena>,
    }
    impl<'arena> Visitor<'arena> for Doubler<'arena> {
        fn visit_ident(
            &mut self,
            node: &'arena Node<'arena>,
            _item: &WalkItem<'arena>,
        ) -> Rewrite<'arena> {
            match node {
                Node::Ident { name, .. } if *name == "price" => {
                    Rewrite::Replace(self.b.binary(BinaryOp::Mul, self.b.load("price"), self.b.int(2)))
                }
                _ => Rewrite::Keep,
            }
        }
    }

    let result = transform(&arena, module, &mut Doubler { b }).unwrap();
    let doubled = b.binary(BinaryOp::Mul, b.load("price"), b.int(2));
    let expected = b.module(&[b.assign(
        &[b.store("total")],
        b.binary(BinaryOp::Add, doubled, b.binary(BinaryOp::Mul, b.load("price"), b.int(2))),
    )]);
    assert_eq!(result, expected);
}
