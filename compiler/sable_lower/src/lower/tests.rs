use super::*;
use pretty_assertions::assert_eq;
use sable_ir::{BinaryOp, CompilationUnit, DeclKind, ExprKind, NamedOp, NumericType, UnaryOp};

use crate::operators::{ExplicitCall, Infix};

const I32: Type = Type::Numeric(NumericType::I32);
const I64: Type = Type::Numeric(NumericType::I64);
const F32: Type = Type::Numeric(NumericType::F32);
const F64: Type = Type::Numeric(NumericType::F64);

fn lower_with<O: OperatorLowering>(
    unit: CompilationUnit,
    interner: &StringInterner,
    config: &LowerConfig,
) -> Result<(ExprArena, Vec<Declaration>), LowerError> {
    let mut symbols = SymbolTable::new();
    for decl in unit.decls {
        symbols.define(decl, interner)?;
    }
    let capabilities = CapabilityIndex::build(&symbols);
    Lowerer::<O>::new(&unit.arena, &symbols, &capabilities, interner, config).lower_decls()
}

fn lower(unit: CompilationUnit, interner: &StringInterner) -> Result<(ExprArena, Vec<Declaration>), LowerError> {
    lower_with::<Infix>(unit, interner, &LowerConfig::default())
}

fn body(decls: &[Declaration], index: usize) -> ExprId {
    match decls[index].kind {
        DeclKind::Function { body, .. } => body,
        DeclKind::Constant { value, .. } => value,
        _ => panic!("declaration {index} has no body"),
    }
}

#[test]
fn integer_literal_in_float_context_becomes_float() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let two = unit.int(2);
    unit.add_function(interner.intern("f"), &[], F32, two);

    let (arena, decls) = lower(unit, &interner).unwrap();
    let root = body(&decls, 0);
    assert_eq!(*arena.kind(root), ExprKind::Float(2.0f64.to_bits()));
    assert_eq!(arena.ty(root), Some(F32));
}

#[test]
fn literal_outside_its_range_is_rejected() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let big = unit.int(300);
    unit.add_function(interner.intern("f"), &[], Type::Numeric(NumericType::U8), big);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::LiteralOutOfRange {
            value: 300,
            ty: NumericType::U8
        }
    );
    assert_eq!(err.origin, Some(DeclId::new(0)));
}

#[test]
fn untyped_constant_with_literal_value_is_ambiguous() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let one = unit.int(1);
    unit.add_constant(interner.intern("c"), None, one);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(err.kind, LowerErrorKind::AmbiguousLiteral);
}

#[test]
fn untyped_constant_takes_the_type_of_its_value() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let five = unit.int(5);
    let value = unit.convert(NumericType::I32, five);
    unit.add_constant(interner.intern("k"), None, value);

    let (arena, decls) = lower(unit, &interner).unwrap();
    let DeclKind::Constant { ty, value } = decls[0].kind else {
        panic!("expected a constant");
    };
    assert_eq!(ty, Some(I32));
    // An untyped literal binds directly; no conversion node is left.
    assert_eq!(*arena.kind(value), ExprKind::Int(5));
}

#[test]
fn mixed_operands_convert_the_right_side() {
    let interner = StringInterner::new();
    let (a, b) = (interner.intern("a"), interner.intern("b"));
    let mut unit = CompilationUnit::new();
    let left = unit.local(a);
    let right = unit.local(b);
    let sum = unit.binary(BinaryOp::Add, left, right);
    unit.add_function(interner.intern("f"), &[(a, F32), (b, I32)], F32, sum);

    let (arena, decls) = lower(unit, &interner).unwrap();
    let ExprKind::Binary { op, left, right } = *arena.kind(body(&decls, 0)) else {
        panic!("expected a binary node");
    };
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(*arena.kind(left), ExprKind::Local(a));
    let ExprKind::Convert { to, value } = *arena.kind(right) else {
        panic!("expected a conversion on the right");
    };
    assert_eq!(to, NumericType::F32);
    assert_eq!(arena.ty(value), Some(I32));
}

#[test]
fn literal_left_operand_takes_the_right_operand_type() {
    let interner = StringInterner::new();
    let b = interner.intern("b");
    let mut unit = CompilationUnit::new();
    let one = unit.int(1);
    let right = unit.local(b);
    let sum = unit.binary(BinaryOp::Add, one, right);
    unit.add_function(interner.intern("f"), &[(b, I64)], I64, sum);

    let (arena, decls) = lower(unit, &interner).unwrap();
    let ExprKind::Binary { left, right, .. } = *arena.kind(body(&decls, 0)) else {
        panic!("expected a binary node");
    };
    assert_eq!(arena.ty(left), Some(I64));
    assert_eq!(*arena.kind(right), ExprKind::Local(b));
}

#[test]
fn negative_integer_exponent_is_rejected() {
    let interner = StringInterner::new();
    let a = interner.intern("a");
    let mut unit = CompilationUnit::new();
    let base = unit.local(a);
    let one = unit.int(1);
    let exponent = unit.unary(UnaryOp::Neg, one);
    let power = unit.binary(BinaryOp::Pow, base, exponent);
    unit.add_function(interner.intern("f"), &[(a, I32)], I32, power);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::InvalidExponent {
            base: NumericType::I32
        }
    );
}

#[test]
fn float_floor_division_is_floor_of_true_division() {
    let interner = StringInterner::new();
    let (a, b) = (interner.intern("a"), interner.intern("b"));
    let mut unit = CompilationUnit::new();
    let left = unit.local(a);
    let right = unit.local(b);
    let quotient = unit.binary(BinaryOp::FloorDiv, left, right);
    unit.add_function(interner.intern("f"), &[(a, F64), (b, F64)], F64, quotient);

    let (arena, decls) = lower(unit, &interner).unwrap();
    let ExprKind::FloorOf(inner) = *arena.kind(body(&decls, 0)) else {
        panic!("expected a floor");
    };
    assert!(matches!(
        *arena.kind(inner),
        ExprKind::Binary {
            op: BinaryOp::Div,
            ..
        }
    ));
}

#[test]
fn integer_floor_division_stays_an_operator() {
    let interner = StringInterner::new();
    let (a, b) = (interner.intern("a"), interner.intern("b"));
    let mut unit = CompilationUnit::new();
    let left = unit.local(a);
    let right = unit.local(b);
    let quotient = unit.binary(BinaryOp::FloorDiv, left, right);
    unit.add_function(interner.intern("f"), &[(a, I32), (b, I32)], I32, quotient);

    let (arena, decls) = lower(unit, &interner).unwrap();
    assert!(matches!(
        *arena.kind(body(&decls, 0)),
        ExprKind::Binary {
            op: BinaryOp::FloorDiv,
            ..
        }
    ));
}

#[test]
fn integer_true_division_rounds_down() {
    let interner = StringInterner::new();
    let (a, b) = (interner.intern("a"), interner.intern("b"));
    let unit = || {
        let mut unit = CompilationUnit::new();
        let left = unit.local(a);
        let right = unit.local(b);
        let quotient = unit.binary(BinaryOp::Div, left, right);
        unit.add_function(interner.intern("f"), &[(a, I32), (b, I32)], I32, quotient);
        unit
    };

    let (arena, decls) = lower(unit(), &interner).unwrap();
    let root = body(&decls, 0);
    assert!(matches!(
        *arena.kind(root),
        ExprKind::Binary {
            op: BinaryOp::FloorDiv,
            ..
        }
    ));
    assert_eq!(arena.ty(root), Some(I32));

    let (arena, decls) =
        lower_with::<ExplicitCall>(unit(), &interner, &LowerConfig::default()).unwrap();
    assert!(matches!(
        *arena.kind(body(&decls, 0)),
        ExprKind::OpCall {
            op: NamedOp::FloorDiv,
            ..
        }
    ));
}

#[test]
fn folded_integer_division_rounds_toward_negative_infinity() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let seven = unit.int(7);
    let neg = unit.unary(UnaryOp::Neg, seven);
    let two = unit.int(2);
    let quotient = unit.binary(BinaryOp::Div, neg, two);
    unit.add_function(interner.intern("f"), &[], I32, quotient);

    let config = LowerConfig::default().with_fold_constants(true);
    let (arena, decls) = lower_with::<Infix>(unit, &interner, &config).unwrap();
    assert_eq!(*arena.kind(body(&decls, 0)), ExprKind::Int(-4));
}

#[test]
fn text_argument_for_a_numeric_parameter_is_a_literal_mismatch() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut unit = CompilationUnit::new();
    let read = unit.local(x);
    unit.add_function(interner.intern("id"), &[(x, I32)], I32, read);
    let text = unit.str(interner.intern("2;"));
    let call = unit.call(interner.intern("id"), &[text]);
    unit.add_function(interner.intern("f"), &[], I32, call);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::TypeMismatchLiteral {
            literal: "string",
            expected: "int32".into()
        }
    );
    assert_eq!(err.code(), sable_diagnostic::ErrorCode::E3001);
}

#[test]
fn boolean_where_a_number_is_returned_is_a_literal_mismatch() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let yes = unit.bool(true);
    unit.add_function(interner.intern("f"), &[], F64, yes);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::TypeMismatchLiteral {
            literal: "boolean",
            expected: "float64".into()
        }
    );
}

fn negated(interner: &StringInterner, value: i64, ret: NumericType) -> CompilationUnit {
    let mut unit = CompilationUnit::new();
    let magnitude = unit.int(value);
    let neg = unit.unary(UnaryOp::Neg, magnitude);
    unit.add_function(interner.intern("f"), &[], Type::Numeric(ret), neg);
    unit
}

#[test]
fn negated_literal_reaches_the_signed_minimum() {
    let interner = StringInterner::new();

    let (arena, decls) = lower(negated(&interner, 128, NumericType::I8), &interner).unwrap();
    let root = body(&decls, 0);
    assert_eq!(*arena.kind(root), ExprKind::Int(-128));
    assert_eq!(arena.ty(root), Some(Type::Numeric(NumericType::I8)));

    let err = lower(negated(&interner, 129, NumericType::I8), &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::LiteralOutOfRange {
            value: -129,
            ty: NumericType::I8
        }
    );
}

#[test]
fn int64_bounds_through_negation() {
    let interner = StringInterner::new();

    let (arena, decls) = lower(negated(&interner, i64::MAX, NumericType::I64), &interner).unwrap();
    assert_eq!(*arena.kind(body(&decls, 0)), ExprKind::Int(-i64::MAX));

    let mut unit = CompilationUnit::new();
    let min = unit.int(i64::MIN);
    unit.add_function(interner.intern("f"), &[], I64, min);
    let (arena, decls) = lower(unit, &interner).unwrap();
    assert_eq!(*arena.kind(body(&decls, 0)), ExprKind::Int(i64::MIN));

    let err = lower(negated(&interner, i64::MIN, NumericType::I64), &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::LiteralOutOfRange {
            value: -i128::from(i64::MIN),
            ty: NumericType::I64
        }
    );
}

#[test]
fn negated_literal_in_a_numeric_constructor() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let magnitude = unit.int(128);
    let neg = unit.unary(UnaryOp::Neg, magnitude);
    let call = unit.call(interner.intern("int8"), &[neg]);
    unit.add_function(interner.intern("f"), &[], Type::Numeric(NumericType::I8), call);

    let (arena, decls) = lower(unit, &interner).unwrap();
    assert_eq!(*arena.kind(body(&decls, 0)), ExprKind::Int(-128));
}

#[test]
fn let_binding_coerces_to_its_declared_type() {
    let interner = StringInterner::new();
    let (a, x) = (interner.intern("a"), interner.intern("x"));
    let mut unit = CompilationUnit::new();
    let value = unit.local(a);
    let bind = unit.let_(x, Some(I64), value);
    let read = unit.local(x);
    let one = unit.int(1);
    let sum = unit.binary(BinaryOp::Add, read, one);
    let block = unit.block(&[bind, sum]);
    unit.add_function(interner.intern("f"), &[(a, I32)], I64, block);

    let (arena, decls) = lower(unit, &interner).unwrap();
    let root = body(&decls, 0);
    assert_eq!(arena.ty(root), Some(I64));
    let ExprKind::Block { exprs } = *arena.kind(root) else {
        panic!("expected a block");
    };
    let ExprKind::Let { value, .. } = *arena.kind(arena.get_expr_list(exprs)[0]) else {
        panic!("expected a let");
    };
    assert!(matches!(
        *arena.kind(value),
        ExprKind::Convert {
            to: NumericType::I64,
            ..
        }
    ));
}

#[test]
fn locals_do_not_escape_their_block() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut unit = CompilationUnit::new();
    let one = unit.int(1);
    let bind = unit.let_(x, Some(I32), one);
    let inner = unit.block(&[bind]);
    let read = unit.local(x);
    let outer = unit.block(&[inner, read]);
    unit.add_function(interner.intern("f"), &[], I32, outer);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(err.kind, LowerErrorKind::UnknownLocal { name: "x".into() });
}

#[test]
fn construction_is_emitted_in_field_order() {
    let interner = StringInterner::new();
    let (x, y) = (interner.intern("x"), interner.intern("y"));
    let mut unit = CompilationUnit::new();
    let point = unit.add_record(interner.intern("Point"), &[(x, F32), (y, F32)]);
    let one = unit.int(1);
    let two = unit.float(2.5);
    let build = unit.construct(point, &[(y, two), (x, one)]);
    unit.add_function(interner.intern("origin"), &[], Type::Record(point), build);

    let (arena, decls) = lower(unit, &interner).unwrap();
    let ExprKind::Construct { fields, .. } = *arena.kind(body(&decls, 1)) else {
        panic!("expected a construction");
    };
    let inits = arena.get_field_inits(fields);
    assert_eq!(inits[0].name, x);
    assert_eq!(*arena.kind(inits[0].value), ExprKind::Float(1.0f64.to_bits()));
    assert_eq!(inits[1].name, y);
}

#[test]
fn construction_reports_missing_and_unknown_fields() {
    let interner = StringInterner::new();
    let (x, z) = (interner.intern("x"), interner.intern("z"));
    let mut unit = CompilationUnit::new();
    let point = unit.add_record(interner.intern("Point"), &[(x, F32)]);
    let empty = unit.construct(point, &[]);
    unit.add_function(interner.intern("a"), &[], Type::Record(point), empty);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::MissingField {
            record: "Point".into(),
            field: "x".into()
        }
    );

    let mut unit = CompilationUnit::new();
    let point = unit.add_record(interner.intern("Point"), &[(x, F32)]);
    let one = unit.float(1.0);
    let stray = unit.construct(point, &[(x, one), (z, one)]);
    unit.add_function(interner.intern("b"), &[], Type::Record(point), stray);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::UnknownField {
            ty: "Point".into(),
            field: "z".into()
        }
    );
}

#[test]
fn overloads_are_picked_by_argument_shape() {
    let interner = StringInterner::new();
    let (scale, x) = (interner.intern("scale"), interner.intern("x"));
    let mut unit = CompilationUnit::new();
    let p = unit.local(x);
    let by_float = unit.add_function(scale, &[(x, F32)], F32, p);
    let q = unit.local(x);
    unit.add_function(scale, &[(x, I32)], I32, q);
    let half = unit.float(0.5);
    let call = unit.call(scale, &[half]);
    unit.add_function(interner.intern("main"), &[], F32, call);

    let (arena, decls) = lower(unit, &interner).unwrap();
    let ExprKind::CallDecl { target, .. } = *arena.kind(body(&decls, 2)) else {
        panic!("expected a resolved call");
    };
    assert_eq!(target, by_float);
}

#[test]
fn integer_literal_matching_two_overloads_is_ambiguous() {
    let interner = StringInterner::new();
    let (scale, x) = (interner.intern("scale"), interner.intern("x"));
    let mut unit = CompilationUnit::new();
    let p = unit.local(x);
    unit.add_function(scale, &[(x, F32)], F32, p);
    let q = unit.local(x);
    unit.add_function(scale, &[(x, I32)], I32, q);
    let two = unit.int(2);
    let call = unit.call(scale, &[two]);
    unit.add_function(interner.intern("main"), &[], I32, call);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::AmbiguousOverload {
            name: "scale".into(),
            candidates: 2
        }
    );
    assert_eq!(err.origin, Some(DeclId::new(2)));
}

#[test]
fn wrong_argument_count_is_reported() {
    let interner = StringInterner::new();
    let (id, x) = (interner.intern("id"), interner.intern("x"));
    let mut unit = CompilationUnit::new();
    let p = unit.local(x);
    unit.add_function(id, &[(x, I32)], I32, p);
    let call = unit.call(id, &[]);
    unit.add_function(interner.intern("main"), &[], I32, call);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::ArgCountMismatch {
            name: "id".into(),
            expected: 1,
            found: 0
        }
    );
}

#[test]
fn not_requires_a_bool() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let one = unit.int(1);
    let not = unit.unary(UnaryOp::Not, one);
    unit.add_function(interner.intern("f"), &[], Type::Bool, not);

    let err = lower(unit, &interner).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::TypeMismatchLiteral {
            literal: "integer",
            expected: "bool".into()
        }
    );
}

#[test]
fn explicit_call_style_names_every_operator() {
    let interner = StringInterner::new();
    let (a, s) = (interner.intern("a"), interner.intern("s"));
    let mut unit = CompilationUnit::new();
    let left = unit.local(a);
    let one = unit.int(1);
    let diff = unit.binary(BinaryOp::Sub, left, one);
    let neg = unit.unary(UnaryOp::Neg, diff);
    unit.add_function(interner.intern("f"), &[(a, I32)], I32, neg);
    let text = unit.local(s);
    let bang = unit.str(interner.intern("!"));
    let joined = unit.binary(BinaryOp::Add, text, bang);
    unit.add_function(interner.intern("g"), &[(s, Type::Str)], Type::Str, joined);

    let (arena, decls) =
        lower_with::<ExplicitCall>(unit, &interner, &LowerConfig::default()).unwrap();
    let ExprKind::OpCall { op, args } = *arena.kind(body(&decls, 0)) else {
        panic!("expected an operator call");
    };
    assert_eq!(op, NamedOp::Neg);
    assert!(matches!(
        *arena.kind(arena.get_expr_list(args)[0]),
        ExprKind::OpCall {
            op: NamedOp::Sub,
            ..
        }
    ));
    assert!(matches!(
        *arena.kind(body(&decls, 1)),
        ExprKind::OpCall {
            op: NamedOp::Concat,
            ..
        }
    ));
}

#[test]
fn folding_evaluates_literal_operators_in_place() {
    let interner = StringInterner::new();
    let mut unit = CompilationUnit::new();
    let two = unit.int(2);
    let three = unit.int(3);
    let product = unit.binary(BinaryOp::Mul, two, three);
    unit.add_function(interner.intern("f"), &[], Type::Numeric(NumericType::I8), product);

    let config = LowerConfig::default().with_fold_constants(true);
    let (arena, decls) = lower_with::<Infix>(unit, &interner, &config).unwrap();
    assert_eq!(*arena.kind(body(&decls, 0)), ExprKind::Int(6));
}

#[test]
fn comparisons_are_typed_bool() {
    let interner = StringInterner::new();
    let (a, b) = (interner.intern("a"), interner.intern("b"));
    let mut unit = CompilationUnit::new();
    let left = unit.local(a);
    let right = unit.local(b);
    let less = unit.binary(BinaryOp::Lt, left, right);
    unit.add_function(interner.intern("f"), &[(a, Type::Str), (b, Type::Str)], Type::Bool, less);

    let (arena, decls) = lower(unit, &interner).unwrap();
    assert_eq!(arena.ty(body(&decls, 0)), Some(Type::Bool));
}
