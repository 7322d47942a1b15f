//! Flat expression arena.
//!
//! Struct-of-arrays layout: parallel `kinds`, `spans` and `types` vectors
//! indexed by [`ExprId`], plus flattened side tables for argument lists and
//! field initializers.

use crate::{ExprId, ExprKind, ExprRange, FieldInit, FieldInitRange, Span, Type};

fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}

fn to_u16(len: usize, what: &str) -> u16 {
    u16::try_from(len).unwrap_or_else(|_| panic!("{what} too long: {len} exceeds u16::MAX"))
}

/// Arena owning every expression of one compilation unit.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprArena {
    kinds: Vec<ExprKind>,
    spans: Vec<Span>,
    /// `None` where the front-end left the type open; lowered arenas fill
    /// every slot.
    types: Vec<Option<Type>>,
    expr_lists: Vec<ExprId>,
    field_inits: Vec<FieldInit>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an untyped expression.
    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.push(kind, span, None)
    }

    /// Allocate an expression with a known type.
    pub fn alloc_typed(&mut self, kind: ExprKind, span: Span, ty: Type) -> ExprId {
        self.push(kind, span, Some(ty))
    }

    fn push(&mut self, kind: ExprKind, span: Span, ty: Option<Type>) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(kind);
        self.spans.push(span);
        self.types.push(ty);
        id
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.kinds[id.index()]
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.spans[id.index()]
    }

    /// Type annotation or lowered type of a node.
    #[inline]
    pub fn ty(&self, id: ExprId) -> Option<Type> {
        self.types[id.index()]
    }

    /// Replace a node's kind in place, keeping its span and type.
    pub fn set_kind(&mut self, id: ExprId, kind: ExprKind) {
        self.kinds[id.index()] = kind;
    }

    pub fn set_ty(&mut self, id: ExprId, ty: Type) {
        self.types[id.index()] = Some(ty);
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterate over every allocated ID.
    pub fn ids(&self) -> impl Iterator<Item = ExprId> {
        (0..to_u32(self.kinds.len(), "expressions")).map(ExprId::new)
    }

    /// Allocate a contiguous list of expression IDs.
    pub fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        if ids.is_empty() {
            return ExprRange::EMPTY;
        }
        let start = to_u32(self.expr_lists.len(), "expression lists");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, to_u16(ids.len(), "expression list"))
    }

    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Allocate a contiguous list of field initializers.
    pub fn push_field_inits(&mut self, inits: &[FieldInit]) -> FieldInitRange {
        if inits.is_empty() {
            return FieldInitRange::EMPTY;
        }
        let start = to_u32(self.field_inits.len(), "field initializers");
        self.field_inits.extend_from_slice(inits);
        FieldInitRange::new(start, to_u16(inits.len(), "field initializer list"))
    }

    pub fn get_field_inits(&self, range: FieldInitRange) -> &[FieldInit] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.field_inits[start..start + range.len()]
    }
}

#[cfg(test)]
mod tests;
