//! Operator lowering strategies.
//!
//! The target has no operator overloading, so every operator is emitted in
//! one of two fixed shapes. The lowerer is generic over the strategy and a
//! run instantiates exactly one, so a lowered unit never mixes shapes.

use sable_ir::{BinaryOp, ExprArena, ExprId, ExprKind, NamedOp, Span, Type, UnaryOp};

use crate::OperatorStyle;

/// How an operator node is emitted once its operands are lowered.
pub trait OperatorLowering {
    const STYLE: OperatorStyle;

    /// Emit `left op right`. `on_strings` is set when both operands are
    /// strings, which turns `+` into concatenation.
    fn binary(
        arena: &mut ExprArena,
        op: BinaryOp,
        on_strings: bool,
        operands: (ExprId, ExprId),
        span: Span,
        ty: Type,
    ) -> ExprId;

    fn unary(arena: &mut ExprArena, op: UnaryOp, operand: ExprId, span: Span, ty: Type) -> ExprId;
}

/// `a + b`, `not x`.
#[derive(Copy, Clone, Debug)]
pub struct Infix;

impl OperatorLowering for Infix {
    const STYLE: OperatorStyle = OperatorStyle::Infix;

    fn binary(
        arena: &mut ExprArena,
        op: BinaryOp,
        _on_strings: bool,
        (left, right): (ExprId, ExprId),
        span: Span,
        ty: Type,
    ) -> ExprId {
        arena.alloc_typed(ExprKind::Binary { op, left, right }, span, ty)
    }

    fn unary(arena: &mut ExprArena, op: UnaryOp, operand: ExprId, span: Span, ty: Type) -> ExprId {
        arena.alloc_typed(ExprKind::Unary { op, operand }, span, ty)
    }
}

/// `op.add(a, b)`, `op.not_(x)`.
#[derive(Copy, Clone, Debug)]
pub struct ExplicitCall;

impl OperatorLowering for ExplicitCall {
    const STYLE: OperatorStyle = OperatorStyle::ExplicitCall;

    fn binary(
        arena: &mut ExprArena,
        op: BinaryOp,
        on_strings: bool,
        (left, right): (ExprId, ExprId),
        span: Span,
        ty: Type,
    ) -> ExprId {
        let op = NamedOp::from_binary(op, on_strings);
        let args = arena.push_expr_list(&[left, right]);
        arena.alloc_typed(ExprKind::OpCall { op, args }, span, ty)
    }

    fn unary(arena: &mut ExprArena, op: UnaryOp, operand: ExprId, span: Span, ty: Type) -> ExprId {
        let op = NamedOp::from_unary(op);
        let args = arena.push_expr_list(&[operand]);
        arena.alloc_typed(ExprKind::OpCall { op, args }, span, ty)
    }
}
