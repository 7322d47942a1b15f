//! Top-level declarations.

use std::fmt;

use crate::{ExprId, Name, Span, Type};

/// Origin identity of a declaration: its index in the compilation unit.
///
/// Stable across every pass. The emitted name is assigned separately by
/// the renamer, so two declarations may share a base name but never an ID.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        DeclId(index)
    }

    /// ID of the declaration at `index` in its unit.
    ///
    /// # Panics
    /// Panics if `index` exceeds `u32::MAX`, the same capacity limit the
    /// expression arena enforces.
    pub fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index)
            .unwrap_or_else(|_| panic!("too many declarations: {index} exceeds u32::MAX"));
        DeclId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// Function parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: Name,
    pub ty: Type,
}

/// Record field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: Name,
    pub ty: Type,
}

/// Declaration payload.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    Function {
        params: Vec<Param>,
        ret: Type,
        body: ExprId,
    },
    /// Function provided by the target environment (`print`, `str`, ...).
    /// Has no body, and its name is emitted verbatim.
    Extern { params: Vec<Param>, ret: Type },
    Record { fields: Vec<Field> },
    /// Module-level constant binding. `ty` is `None` when the front-end left
    /// it to be inferred from the value.
    Constant { ty: Option<Type>, value: ExprId },
}

/// Named top-level entity of a compilation unit.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    /// Base name as written in the source.
    pub name: Name,
    pub kind: DeclKind,
    pub span: Span,
}

impl Declaration {
    /// Parameters of a function or extern.
    pub fn params(&self) -> Option<&[Param]> {
        match &self.kind {
            DeclKind::Function { params, .. } | DeclKind::Extern { params, .. } => Some(params),
            DeclKind::Record { .. } | DeclKind::Constant { .. } => None,
        }
    }

    /// Return type of a function or extern.
    pub fn ret(&self) -> Option<Type> {
        match &self.kind {
            DeclKind::Function { ret, .. } | DeclKind::Extern { ret, .. } => Some(*ret),
            DeclKind::Record { .. } | DeclKind::Constant { .. } => None,
        }
    }

    /// Fields of a record.
    pub fn fields(&self) -> Option<&[Field]> {
        match &self.kind {
            DeclKind::Record { fields } => Some(fields),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, DeclKind::Function { .. } | DeclKind::Extern { .. })
    }

    pub fn is_extern(&self) -> bool {
        matches!(self.kind, DeclKind::Extern { .. })
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, DeclKind::Constant { .. })
    }

    /// Short description for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self.kind {
            DeclKind::Function { .. } => "function",
            DeclKind::Extern { .. } => "extern function",
            DeclKind::Record { .. } => "record",
            DeclKind::Constant { .. } => "constant",
        }
    }
}
