use super::*;
use crate::{Name, NumericType};
use pretty_assertions::assert_eq;

#[test]
fn test_alloc_and_query() {
    let mut arena = ExprArena::new();
    let a = arena.alloc(ExprKind::Int(1), Span::new(0, 1));
    let b = arena.alloc_typed(ExprKind::Bool(true), Span::new(2, 6), Type::Bool);

    assert_eq!(arena.len(), 2);
    assert_eq!(*arena.kind(a), ExprKind::Int(1));
    assert_eq!(arena.ty(a), None);
    assert_eq!(arena.ty(b), Some(Type::Bool));
    assert_eq!(arena.span(b), Span::new(2, 6));
}

#[test]
fn test_expr_lists() {
    let mut arena = ExprArena::new();
    let a = arena.alloc(ExprKind::Int(1), Span::DUMMY);
    let b = arena.alloc(ExprKind::Int(2), Span::DUMMY);

    let range = arena.push_expr_list(&[a, b]);
    assert_eq!(arena.get_expr_list(range), &[a, b]);

    let empty = arena.push_expr_list(&[]);
    assert!(empty.is_empty());
    assert!(arena.get_expr_list(empty).is_empty());
}

#[test]
fn test_field_inits() {
    let mut arena = ExprArena::new();
    let value = arena.alloc(ExprKind::Str(Name::from_raw(7)), Span::DUMMY);
    let init = FieldInit {
        name: Name::from_raw(3),
        value,
    };
    let range = arena.push_field_inits(&[init]);
    assert_eq!(arena.get_field_inits(range), &[init]);
}

#[test]
fn test_set_kind_keeps_span_and_type() {
    let mut arena = ExprArena::new();
    let id = arena.alloc_typed(
        ExprKind::Int(1),
        Span::new(4, 5),
        Type::Numeric(NumericType::I32),
    );
    arena.set_kind(id, ExprKind::Int(2));
    assert_eq!(*arena.kind(id), ExprKind::Int(2));
    assert_eq!(arena.span(id), Span::new(4, 5));
    assert_eq!(arena.ty(id), Some(Type::Numeric(NumericType::I32)));
}

#[test]
fn test_ids_cover_arena() {
    let mut arena = ExprArena::new();
    arena.alloc(ExprKind::Unit, Span::DUMMY);
    arena.alloc(ExprKind::Unit, Span::DUMMY);
    assert_eq!(arena.ids().count(), 2);
}
