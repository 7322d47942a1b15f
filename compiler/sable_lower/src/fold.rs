//! Constant folding.
//!
//! Runs inside lowering, right after an operator node is emitted, and once
//! more over constant values copied in by inline materialization. Folding
//! uses the target's semantics for the operand type:
//! - integers are checked against the operand width
//! - `float32` results are rounded to single precision
//! - floor division and modulo round toward negative infinity
//!
//! Anything that would trap or leave the representable range (division by
//! zero, overflow, a non-finite float) is left for the target to evaluate.

use sable_ir::{BinaryOp, ExprArena, ExprId, ExprKind, NumericType, Operator, UnaryOp};

use crate::stack::ensure_sufficient_stack;

/// Literal operand value.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Const {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(sable_ir::Name),
}

fn extract(arena: &ExprArena, id: ExprId) -> Option<Const> {
    match *arena.kind(id) {
        ExprKind::Int(v) => Some(Const::Int(v)),
        ExprKind::Float(bits) => Some(Const::Float(f64::from_bits(bits))),
        ExprKind::Bool(v) => Some(Const::Bool(v)),
        ExprKind::Str(name) => Some(Const::Str(name)),
        _ => None,
    }
}

/// Try to evaluate the operator node `id`.
///
/// Returns the literal it evaluates to, or `None` when an operand is not a
/// literal or the operation must stay for the target.
pub fn try_fold(arena: &ExprArena, id: ExprId) -> Option<ExprKind> {
    match *arena.kind(id) {
        ExprKind::Binary { op, left, right } => fold_binary_node(arena, op, left, right),
        ExprKind::Unary { op, operand } => fold_unary_node(arena, op, operand),
        ExprKind::OpCall { op, args } => match (op.operator(), arena.get_expr_list(args)) {
            (Operator::Binary(op), &[left, right]) => fold_binary_node(arena, op, left, right),
            (Operator::Unary(op), &[operand]) => fold_unary_node(arena, op, operand),
            _ => None,
        },
        ExprKind::FloorOf(value) => match extract(arena, value)? {
            Const::Float(v) => finite(v.floor()),
            Const::Int(v) => Some(ExprKind::Int(v)),
            Const::Bool(_) | Const::Str(_) => None,
        },
        _ => None,
    }
}

/// Fold every foldable node under `root`, bottom-up.
pub fn fold_tree(arena: &mut ExprArena, root: ExprId) {
    ensure_sufficient_stack(|| {
        for child in children(arena, root) {
            fold_tree(arena, child);
        }
        if let Some(kind) = try_fold(arena, root) {
            arena.set_kind(root, kind);
        }
    });
}

fn children(arena: &ExprArena, id: ExprId) -> Vec<ExprId> {
    match *arena.kind(id) {
        ExprKind::Field { receiver: child, .. }
        | ExprKind::Unary { operand: child, .. }
        | ExprKind::FloorOf(child)
        | ExprKind::Convert { value: child, .. }
        | ExprKind::Let { value: child, .. } => vec![child],
        ExprKind::Binary { left, right, .. } => vec![left, right],
        ExprKind::OpCall { args, .. }
        | ExprKind::Call { args, .. }
        | ExprKind::CallDecl { args, .. }
        | ExprKind::Block { exprs: args } => arena.get_expr_list(args).to_vec(),
        ExprKind::Construct { fields, .. } => arena
            .get_field_inits(fields)
            .iter()
            .map(|init| init.value)
            .collect(),
        ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Bool(_)
        | ExprKind::Str(_)
        | ExprKind::Unit
        | ExprKind::Local(_)
        | ExprKind::Global(_)
        | ExprKind::ConstRef(_) => Vec::new(),
    }
}

fn fold_binary_node(arena: &ExprArena, op: BinaryOp, left: ExprId, right: ExprId) -> Option<ExprKind> {
    let ty = arena.ty(left).and_then(sable_ir::Type::as_numeric);
    fold_binary(op, ty, extract(arena, left)?, extract(arena, right)?)
}

fn fold_unary_node(arena: &ExprArena, op: UnaryOp, operand: ExprId) -> Option<ExprKind> {
    let ty = arena.ty(operand).and_then(sable_ir::Type::as_numeric);
    match (op, extract(arena, operand)?) {
        (UnaryOp::Neg, Const::Int(v)) => int_result(ty?, -i128::from(v)),
        (UnaryOp::Neg, Const::Float(v)) => finite(-v),
        (UnaryOp::Not, Const::Bool(v)) => Some(ExprKind::Bool(!v)),
        _ => None,
    }
}

fn fold_binary(op: BinaryOp, ty: Option<NumericType>, left: Const, right: Const) -> Option<ExprKind> {
    if op.is_comparison() {
        return fold_comparison(op, left, right).map(ExprKind::Bool);
    }
    match (left, right) {
        (Const::Int(a), Const::Int(b)) => fold_int(op, ty?, i128::from(a), i128::from(b)),
        (Const::Float(a), Const::Float(b)) => {
            let ty = ty?;
            let value = fold_float(op, a, b)?;
            finite(ty.round_float(value))
        }
        (Const::Bool(a), Const::Bool(b)) => match op {
            BinaryOp::And => Some(ExprKind::Bool(a && b)),
            BinaryOp::Or => Some(ExprKind::Bool(a || b)),
            _ => None,
        },
        _ => None,
    }
}

fn fold_comparison(op: BinaryOp, left: Const, right: Const) -> Option<bool> {
    let ordering = match (left, right) {
        (Const::Int(a), Const::Int(b)) => a.partial_cmp(&b),
        (Const::Float(a), Const::Float(b)) => a.partial_cmp(&b),
        (Const::Bool(a), Const::Bool(b)) if matches!(op, BinaryOp::Eq | BinaryOp::NotEq) => {
            a.partial_cmp(&b)
        }
        (Const::Str(a), Const::Str(b)) if matches!(op, BinaryOp::Eq | BinaryOp::NotEq) => {
            // Interned: equal names are equal strings.
            return Some((a == b) == (op == BinaryOp::Eq));
        }
        _ => return None,
    };
    // NaN compares unequal to everything.
    let Some(ordering) = ordering else {
        return Some(op == BinaryOp::NotEq);
    };
    Some(match op {
        BinaryOp::Eq => ordering.is_eq(),
        BinaryOp::NotEq => ordering.is_ne(),
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::GtEq => ordering.is_ge(),
        _ => return None,
    })
}

fn fold_int(op: BinaryOp, ty: NumericType, a: i128, b: i128) -> Option<ExprKind> {
    let value = match op {
        BinaryOp::Add => a.checked_add(b)?,
        BinaryOp::Sub => a.checked_sub(b)?,
        BinaryOp::Mul => a.checked_mul(b)?,
        BinaryOp::FloorDiv => floor_div(a, b)?,
        BinaryOp::Mod => floor_mod(a, b)?,
        BinaryOp::Pow => a.checked_pow(u32::try_from(b).ok()?)?,
        // True division of integers is the target's to define.
        _ => return None,
    };
    int_result(ty, value)
}

fn int_result(ty: NumericType, value: i128) -> Option<ExprKind> {
    if !ty.is_integer() || !ty.fits_int(value) {
        return None;
    }
    i64::try_from(value).ok().map(ExprKind::Int)
}

fn floor_div(a: i128, b: i128) -> Option<i128> {
    let q = a.checked_div(b)?;
    if (a ^ b) < 0 && a % b != 0 {
        Some(q - 1)
    } else {
        Some(q)
    }
}

fn floor_mod(a: i128, b: i128) -> Option<i128> {
    let r = a.checked_rem(b)?;
    if r != 0 && (r < 0) != (b < 0) {
        Some(r + b)
    } else {
        Some(r)
    }
}

fn fold_float(op: BinaryOp, a: f64, b: f64) -> Option<f64> {
    match op {
        BinaryOp::Add => Some(a + b),
        BinaryOp::Sub => Some(a - b),
        BinaryOp::Mul => Some(a * b),
        BinaryOp::Div if b != 0.0 => Some(a / b),
        BinaryOp::FloorDiv if b != 0.0 => Some((a / b).floor()),
        BinaryOp::Mod if b != 0.0 => {
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) {
                Some(r + b)
            } else {
                Some(r)
            }
        }
        BinaryOp::Pow => Some(a.powf(b)),
        _ => None,
    }
}

fn finite(value: f64) -> Option<ExprKind> {
    value.is_finite().then(|| ExprKind::Float(value.to_bits()))
}
