use super::*;
use crate::{BinaryOp, CompilationUnit, StringInterner};
use pretty_assertions::assert_eq;

/// Records every node in visiting order.
#[derive(Default)]
struct Collect(Vec<ExprId>);

impl Visitor for Collect {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        self.0.push(id);
        walk_expr(self, id, arena);
    }
}

#[test]
fn test_walk_visits_children_in_evaluation_order() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let x = unit.local(interner.intern("x"));
    let one = unit.int(1);
    let sum = unit.binary(BinaryOp::Add, x, one);
    let bind = unit.let_(interner.intern("y"), None, sum);
    let text = unit.str(interner.intern("hi"));
    let call = unit.call(interner.intern("print"), &[text]);
    let block = unit.block(&[bind, call]);

    let mut collect = Collect::default();
    collect.visit_expr(block, &unit.arena);
    assert_eq!(collect.0, vec![block, bind, sum, x, one, call, text]);
}

#[test]
fn test_leaves_have_no_children() {
    let mut unit = CompilationUnit::new();
    let leaf = unit.int(3);

    let mut collect = Collect::default();
    collect.visit_expr(leaf, &unit.arena);
    assert_eq!(collect.0, vec![leaf]);
}
