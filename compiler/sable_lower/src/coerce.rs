//! Numeric coercion.
//!
//! Every literal and arithmetic result in a lowered unit carries exactly one
//! [`NumericType`]. Literals are untyped until their context binds them;
//! mixed-type operands meet through an explicit [`ExprKind::Convert`] on the
//! right-hand side.

use sable_ir::{ExprArena, ExprId, ExprKind, NumericType, Span, Type, UnaryOp};

use crate::LowerErrorKind;

/// Type of an input expression before context is applied.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Inferred {
    Known(Type),
    /// Untyped integer literal (or arithmetic over them).
    IntLiteral,
    /// Untyped float literal (or arithmetic involving one).
    FloatLiteral,
}

impl Inferred {
    pub fn known(self) -> Option<Type> {
        match self {
            Inferred::Known(ty) => Some(ty),
            Inferred::IntLiteral | Inferred::FloatLiteral => None,
        }
    }

    pub fn is_literal(self) -> bool {
        !matches!(self, Inferred::Known(_))
    }

    /// Whether a value of this shape can be passed where `param` is required
    /// without a conversion.
    ///
    /// Used to pick between overloads; the chosen overload still coerces.
    pub fn fits(self, param: Type) -> bool {
        match self {
            Inferred::Known(ty) => ty == param,
            Inferred::IntLiteral => param.is_numeric(),
            Inferred::FloatLiteral => param.as_numeric().is_some_and(NumericType::is_float),
        }
    }

    /// Shape of arithmetic over two operands.
    ///
    /// A typed left operand decides; otherwise a typed right operand does.
    /// Two literals stay a literal, float if either is.
    pub fn join(self, right: Inferred) -> Inferred {
        match (self, right) {
            (Inferred::Known(ty), _) | (_, Inferred::Known(ty)) => Inferred::Known(ty),
            (Inferred::FloatLiteral, _) | (_, Inferred::FloatLiteral) => Inferred::FloatLiteral,
            (Inferred::IntLiteral, Inferred::IntLiteral) => Inferred::IntLiteral,
        }
    }
}

/// The type both operands of a binary operator are brought to.
///
/// `None` when neither operand nor the context names one.
pub fn operand_type(left: Inferred, right: Inferred, expected: Option<Type>) -> Option<Type> {
    match left.join(right) {
        Inferred::Known(ty) => Some(ty),
        Inferred::IntLiteral | Inferred::FloatLiteral => expected.filter(|ty| ty.is_numeric()),
    }
}

/// Bind an untyped numeric literal to `ty`.
///
/// Integers must fit the target range. Integers bound to a float type
/// become float literals, and `float32` values are rounded to single
/// precision so every later reader sees the value the target will.
#[expect(
    clippy::cast_precision_loss,
    reason = "integer literals bound to a float type take the nearest float"
)]
pub fn bind_literal(kind: ExprKind, ty: NumericType) -> Result<ExprKind, LowerErrorKind> {
    match kind {
        ExprKind::Int(value) if ty.is_float() => {
            Ok(ExprKind::Float(ty.round_float(value as f64).to_bits()))
        }
        ExprKind::Int(value) if ty.fits_int(i128::from(value)) => Ok(ExprKind::Int(value)),
        ExprKind::Int(value) => Err(LowerErrorKind::LiteralOutOfRange {
            value: i128::from(value),
            ty,
        }),
        ExprKind::Float(bits) if ty.is_float() => {
            Ok(ExprKind::Float(ty.round_float(f64::from_bits(bits)).to_bits()))
        }
        other => Err(LowerErrorKind::TypeMismatchLiteral {
            literal: literal_description(&other),
            expected: ty.name().to_string(),
        }),
    }
}

/// Bind `-literal` to `ty` as a single literal.
///
/// The range check applies to the negated value: `-128` binds to `int8`
/// although `128` does not.
#[expect(
    clippy::cast_precision_loss,
    reason = "integer literals bound to a float type take the nearest float"
)]
pub fn bind_negated_literal(kind: ExprKind, ty: NumericType) -> Result<ExprKind, LowerErrorKind> {
    match kind {
        ExprKind::Int(value) => {
            let negated = -i128::from(value);
            match i64::try_from(negated) {
                Ok(negated) => bind_literal(ExprKind::Int(negated), ty),
                Err(_) if ty.is_float() => {
                    Ok(ExprKind::Float(ty.round_float(-(value as f64)).to_bits()))
                }
                Err(_) => Err(LowerErrorKind::LiteralOutOfRange { value: negated, ty }),
            }
        }
        ExprKind::Float(bits) => bind_literal(ExprKind::Float((-f64::from_bits(bits)).to_bits()), ty),
        other => bind_literal(other, ty),
    }
}

/// How a literal kind is named in messages.
pub fn literal_description(kind: &ExprKind) -> &'static str {
    match kind {
        ExprKind::Int(_) => "integer",
        ExprKind::Float(_) => "float",
        ExprKind::Bool(_) => "boolean",
        ExprKind::Str(_) => "string",
        ExprKind::Unit => "unit",
        _ => "non-literal",
    }
}

/// Bring a lowered value of type `from` to `to`.
///
/// Returns `value` unchanged when the types already agree, otherwise a new
/// conversion node spanning `span`.
pub fn convert(
    arena: &mut ExprArena,
    value: ExprId,
    (from, to): (NumericType, NumericType),
    span: Span,
) -> ExprId {
    if from == to {
        return value;
    }
    tracing::trace!(%from, %to, "inserting conversion");
    arena.alloc_typed(ExprKind::Convert { to, value }, span, Type::Numeric(to))
}

/// Whether `exponent` is a literal that an integer base cannot take: a
/// negative integer or any float.
///
/// Only untyped input is checked. Typed nodes come from an earlier lowering
/// that already accepted them, and folding may have turned an accepted
/// expression into a negative literal.
pub fn is_invalid_int_exponent(src: &ExprArena, exponent: ExprId) -> bool {
    if src.ty(exponent).is_some() {
        return false;
    }
    match *src.kind(exponent) {
        ExprKind::Int(value) => value < 0,
        ExprKind::Float(_) => true,
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => match *src.kind(operand) {
            ExprKind::Int(value) => value > 0,
            ExprKind::Float(_) => true,
            _ => false,
        },
        _ => false,
    }
}
