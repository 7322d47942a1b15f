use super::*;
use pretty_assertions::assert_eq;
use sable_ir::{BinaryOp, NumericType, Param, Span, Type};

const F32: Type = Type::Numeric(NumericType::F32);

struct Lowered {
    arena: ExprArena,
    decls: Vec<Declaration>,
    reference: ExprId,
}

/// `pi: float32 = 3.14` and `def area() -> float32: pi * pi`, already lowered.
fn lowered(interner: &StringInterner) -> Lowered {
    let mut arena = ExprArena::new();
    let value = arena.alloc_typed(ExprKind::Float(f64::from(3.14f32).to_bits()), Span::DUMMY, F32);
    let pi = DeclId::new(0);
    let reference = arena.alloc_typed(ExprKind::ConstRef(pi), Span::DUMMY, F32);
    let other = arena.alloc_typed(ExprKind::ConstRef(pi), Span::DUMMY, F32);
    let body = arena.alloc_typed(
        ExprKind::Binary {
            op: BinaryOp::Mul,
            left: reference,
            right: other,
        },
        Span::DUMMY,
        F32,
    );
    let decls = vec![
        Declaration {
            name: interner.intern("pi"),
            kind: DeclKind::Constant {
                ty: Some(F32),
                value,
            },
            span: Span::DUMMY,
        },
        Declaration {
            name: interner.intern("area"),
            kind: DeclKind::Function {
                params: Vec::<Param>::new(),
                ret: F32,
                body,
            },
            span: Span::DUMMY,
        },
    ];
    Lowered {
        arena,
        decls,
        reference,
    }
}

fn has_const_refs(arena: &ExprArena) -> bool {
    arena
        .ids()
        .any(|id| matches!(arena.kind(id), ExprKind::ConstRef(_)))
}

#[test]
fn inline_replaces_references_with_values() {
    let interner = StringInterner::new();
    let Lowered {
        mut arena,
        mut decls,
        reference,
    } = lowered(&interner);

    materialize(&mut arena, &mut decls, &LowerConfig::default(), &interner).unwrap();

    assert!(!has_const_refs(&arena));
    assert_eq!(*arena.kind(reference), ExprKind::Float(f64::from(3.14f32).to_bits()));
    assert_eq!(arena.ty(reference), Some(F32));
    assert!(decls[0].is_constant(), "inline keeps the module binding");
}

#[test]
fn inline_folds_copied_values_when_enabled() {
    let interner = StringInterner::new();
    let Lowered {
        mut arena,
        mut decls,
        ..
    } = lowered(&interner);
    let config = LowerConfig::default().with_fold_constants(true);

    materialize(&mut arena, &mut decls, &config, &interner).unwrap();

    let DeclKind::Function { body, .. } = decls[1].kind else {
        panic!("area should stay a function");
    };
    let pi = f64::from(3.14f32);
    let expected = F32.as_numeric().unwrap().round_float(pi * pi);
    assert_eq!(*arena.kind(body), ExprKind::Float(expected.to_bits()));
}

#[test]
fn accessor_turns_constants_into_functions() {
    let interner = StringInterner::new();
    let Lowered {
        mut arena,
        mut decls,
        reference,
    } = lowered(&interner);
    let config = LowerConfig::default().with_constant_style(ConstantStyle::Accessor);

    materialize(&mut arena, &mut decls, &config, &interner).unwrap();

    assert!(matches!(
        &decls[0].kind,
        DeclKind::Function { params, ret, .. } if params.is_empty() && *ret == F32
    ));
    assert_eq!(
        *arena.kind(reference),
        ExprKind::CallDecl {
            target: DeclId::new(0),
            args: ExprRange::EMPTY
        }
    );
    assert!(!has_const_refs(&arena));
}

fn constant(interner: &StringInterner, name: &str, value: ExprId) -> Declaration {
    Declaration {
        name: interner.intern(name),
        kind: DeclKind::Constant {
            ty: Some(F32),
            value,
        },
        span: Span::new(0, 1),
    }
}

fn const_ref(arena: &mut ExprArena, target: DeclId) -> ExprId {
    arena.alloc_typed(ExprKind::ConstRef(target), Span::DUMMY, F32)
}

fn plus_one(arena: &mut ExprArena, left: ExprId) -> ExprId {
    let one = arena.alloc_typed(ExprKind::Float(1.0f64.to_bits()), Span::DUMMY, F32);
    arena.alloc_typed(
        ExprKind::Binary {
            op: BinaryOp::Add,
            left,
            right: one,
        },
        Span::DUMMY,
        F32,
    )
}

#[test]
fn self_referencing_constant_is_cyclic_in_every_style() {
    let interner = StringInterner::new();
    let a = DeclId::new(0);
    for style in [ConstantStyle::Inline, ConstantStyle::Accessor] {
        let mut arena = ExprArena::new();
        let reference = const_ref(&mut arena, a);
        let value = plus_one(&mut arena, reference);
        let mut decls = vec![constant(&interner, "a", value)];

        let config = LowerConfig::default().with_constant_style(style);
        let err = materialize(&mut arena, &mut decls, &config, &interner).unwrap_err();
        assert_eq!(err.kind, LowerErrorKind::CyclicConstant { name: "a".into() });
        assert_eq!(err.origin, Some(a));
    }
}

#[test]
fn mutually_referencing_accessors_are_cyclic() {
    let interner = StringInterner::new();
    let (a, b) = (DeclId::new(0), DeclId::new(1));
    let mut arena = ExprArena::new();
    let to_b = const_ref(&mut arena, b);
    let to_a = const_ref(&mut arena, a);
    let a_value = plus_one(&mut arena, to_b);
    let mut decls = vec![
        constant(&interner, "a", a_value),
        constant(&interner, "b", to_a),
    ];

    let config = LowerConfig::default().with_constant_style(ConstantStyle::Accessor);
    let err = materialize(&mut arena, &mut decls, &config, &interner).unwrap_err();
    assert_eq!(err.kind, LowerErrorKind::CyclicConstant { name: "a".into() });
}

#[test]
fn chained_constants_are_not_cyclic() {
    let interner = StringInterner::new();
    let b = DeclId::new(1);
    let mut arena = ExprArena::new();
    let to_b = const_ref(&mut arena, b);
    let a_value = plus_one(&mut arena, to_b);
    let two = arena.alloc_typed(ExprKind::Float(2.0f64.to_bits()), Span::DUMMY, F32);
    let mut decls = vec![
        constant(&interner, "a", a_value),
        constant(&interner, "b", two),
    ];

    let config = LowerConfig::default().with_constant_style(ConstantStyle::Accessor);
    materialize(&mut arena, &mut decls, &config, &interner).unwrap();
    assert!(decls.iter().all(|d| matches!(d.kind, DeclKind::Function { .. })));
    assert_eq!(
        *arena.kind(to_b),
        ExprKind::CallDecl {
            target: b,
            args: ExprRange::EMPTY
        }
    );
}
