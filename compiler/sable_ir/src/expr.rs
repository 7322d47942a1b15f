//! Expression node kinds.
//!
//! One `ExprKind` serves both sides of the engine. Front-ends emit the
//! unresolved forms (`Call`, `Global`, untyped literals); lowering emits the
//! resolved forms (`CallDecl`, `ConstRef`, `OpCall`, `FloorOf`, `Convert`).
//! Lowering accepts its own output, which is what makes re-running the
//! pipeline a fixed point.

use crate::{BinaryOp, DeclId, ExprId, ExprRange, FieldInitRange, Name, NamedOp, NumericType};
use crate::{Type, UnaryOp};

/// Expression kind. `Copy` so passes can match on a copy while mutating
/// the arena it came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    // Literals
    /// Integer literal. Untyped until bound by the coercion engine.
    Int(i64),
    /// Float literal stored as `f64` bits (keeps `Hash`/`Eq` derivable).
    Float(u64),
    Bool(bool),
    Str(Name),
    Unit,

    // References
    /// Parameter or `let`-bound local.
    Local(Name),
    /// Module-level constant, unresolved.
    Global(Name),
    /// Module-level constant, resolved to its declaration.
    ConstRef(DeclId),
    /// Field access on a record value.
    Field { receiver: ExprId, field: Name },

    // Operators
    Unary { op: UnaryOp, operand: ExprId },
    Binary { op: BinaryOp, left: ExprId, right: ExprId },
    /// Operator in explicit named-call form.
    OpCall { op: NamedOp, args: ExprRange },
    /// Round toward negative infinity.
    FloorOf(ExprId),

    // Calls
    /// Call by name: a free function or a capability.
    Call { callee: Name, args: ExprRange },
    /// Call resolved to one declaration.
    CallDecl { target: DeclId, args: ExprRange },
    /// Numeric constructor such as `float32(x)`.
    Convert { to: NumericType, value: ExprId },
    /// Record construction with named fields.
    Construct { record: DeclId, fields: FieldInitRange },

    // Straight-line sequencing
    Let {
        name: Name,
        ty: Option<Type>,
        value: ExprId,
    },
    /// Expressions evaluated in order; the last one is the value.
    Block { exprs: ExprRange },
}

impl ExprKind {
    /// Returns `true` for literal kinds.
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            ExprKind::Int(_) | ExprKind::Float(_) | ExprKind::Bool(_) | ExprKind::Str(_) | ExprKind::Unit
        )
    }
}

/// Named field initializer in a `Construct` expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldInit {
    pub name: Name,
    pub value: ExprId,
}
