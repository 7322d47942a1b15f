//! Binary, unary and named operators.
//!
//! `BinaryOp`/`UnaryOp` are the infix forms; `NamedOp` is the explicit-call
//! form a backend without operator syntax receives. The two are in one-to-one
//! correspondence except for `Concat`, the string form of `+`.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    /// True division.
    Div,
    /// Division rounding toward negative infinity.
    FloorDiv,
    Mod,
    Pow,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Arithmetic operators produce a value of their operand type.
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::FloorDiv | Self::Mod | Self::Pow
        )
    }

    /// Comparison operators produce `bool` from two operands of one type.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    /// Logical operators take and produce `bool`.
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "not",
        }
    }
}

/// Operator as it appears in either form.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Operator {
    Binary(BinaryOp),
    Unary(UnaryOp),
}

/// Explicit named-call form of an operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NamedOp {
    Add,
    Sub,
    Mul,
    TrueDiv,
    FloorDiv,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Neg,
    /// String concatenation (`+` on strings).
    Concat,
}

impl NamedOp {
    /// Name of the operation in the target environment.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::TrueDiv => "truediv",
            Self::FloorDiv => "floordiv",
            Self::Mod => "mod",
            Self::Pow => "pow",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::And => "and_",
            Self::Or => "or_",
            Self::Not => "not_",
            Self::Neg => "neg",
            Self::Concat => "concat",
        }
    }

    /// Number of arguments the call takes.
    pub const fn arity(self) -> usize {
        match self {
            Self::Not | Self::Neg => 1,
            _ => 2,
        }
    }

    /// Named form of a binary operator. `on_strings` selects `Concat` for `+`.
    pub const fn from_binary(op: BinaryOp, on_strings: bool) -> Self {
        match op {
            BinaryOp::Add if on_strings => Self::Concat,
            BinaryOp::Add => Self::Add,
            BinaryOp::Sub => Self::Sub,
            BinaryOp::Mul => Self::Mul,
            BinaryOp::Div => Self::TrueDiv,
            BinaryOp::FloorDiv => Self::FloorDiv,
            BinaryOp::Mod => Self::Mod,
            BinaryOp::Pow => Self::Pow,
            BinaryOp::Eq => Self::Eq,
            BinaryOp::NotEq => Self::Ne,
            BinaryOp::Lt => Self::Lt,
            BinaryOp::LtEq => Self::Le,
            BinaryOp::Gt => Self::Gt,
            BinaryOp::GtEq => Self::Ge,
            BinaryOp::And => Self::And,
            BinaryOp::Or => Self::Or,
        }
    }

    pub const fn from_unary(op: UnaryOp) -> Self {
        match op {
            UnaryOp::Neg => Self::Neg,
            UnaryOp::Not => Self::Not,
        }
    }

    /// The infix operator this call stands for.
    pub const fn operator(self) -> Operator {
        match self {
            Self::Add | Self::Concat => Operator::Binary(BinaryOp::Add),
            Self::Sub => Operator::Binary(BinaryOp::Sub),
            Self::Mul => Operator::Binary(BinaryOp::Mul),
            Self::TrueDiv => Operator::Binary(BinaryOp::Div),
            Self::FloorDiv => Operator::Binary(BinaryOp::FloorDiv),
            Self::Mod => Operator::Binary(BinaryOp::Mod),
            Self::Pow => Operator::Binary(BinaryOp::Pow),
            Self::Eq => Operator::Binary(BinaryOp::Eq),
            Self::Ne => Operator::Binary(BinaryOp::NotEq),
            Self::Lt => Operator::Binary(BinaryOp::Lt),
            Self::Le => Operator::Binary(BinaryOp::LtEq),
            Self::Gt => Operator::Binary(BinaryOp::Gt),
            Self::Ge => Operator::Binary(BinaryOp::GtEq),
            Self::And => Operator::Binary(BinaryOp::And),
            Self::Or => Operator::Binary(BinaryOp::Or),
            Self::Not => Operator::Unary(UnaryOp::Not),
            Self::Neg => Operator::Unary(UnaryOp::Neg),
        }
    }
}
