//! Semantic types carried by expressions and declarations.

use std::fmt;

use crate::DeclId;

/// Fixed-width numeric types.
///
/// The set is closed: every literal and every arithmetic result in a
/// lowered unit carries exactly one of these.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumericType {
    /// Every numeric type, integers first.
    pub const ALL: [NumericType; 10] = [
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
    ];

    /// Name of the type's constructor in the target environment.
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }

    /// Parse a constructor name such as `float32`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        !self.is_float()
    }

    /// Inclusive value range of an integer type, `None` for floats.
    pub const fn int_range(self) -> Option<(i128, i128)> {
        match self {
            Self::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::U8 => Some((0, u8::MAX as i128)),
            Self::U16 => Some((0, u16::MAX as i128)),
            Self::U32 => Some((0, u32::MAX as i128)),
            Self::U64 => Some((0, u64::MAX as i128)),
            Self::F32 | Self::F64 => None,
        }
    }

    /// Whether the integer `value` is representable in this type.
    ///
    /// Every `i64` is representable (possibly inexactly) by the float types.
    pub fn fits_int(self, value: i128) -> bool {
        match self.int_range() {
            Some((min, max)) => (min..=max).contains(&value),
            None => true,
        }
    }

    /// Round a float value to this type's precision.
    ///
    /// `float32` values are stored widened to `f64`; rounding through `f32`
    /// keeps later folding bit-exact with single-precision arithmetic.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "narrowing to f32 is the point of the rounding"
    )]
    pub fn round_float(self, value: f64) -> f64 {
        match self {
            Self::F32 => f64::from(value as f32),
            _ => value,
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic type of an expression, parameter, field or constant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Numeric(NumericType),
    Bool,
    Str,
    Unit,
    /// A record type, identified by its declaration.
    Record(DeclId),
}

impl Type {
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Type::Numeric(_))
    }

    #[inline]
    pub const fn as_numeric(self) -> Option<NumericType> {
        match self {
            Type::Numeric(ty) => Some(ty),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_record(self) -> Option<DeclId> {
        match self {
            Type::Record(id) => Some(id),
            _ => None,
        }
    }
}

impl From<NumericType> for Type {
    fn from(ty: NumericType) -> Self {
        Type::Numeric(ty)
    }
}

#[cfg(test)]
mod tests;
