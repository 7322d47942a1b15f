//! Lowering errors.
//!
//! Every error is fatal to its unit. Names and types are rendered to
//! strings when the error is built, so errors outlive the interner borrow
//! and can cross the `lower_units` thread boundary.

use sable_diagnostic::{Diagnostic, ErrorCode};
use sable_ir::{DeclId, NumericType, Span};
use thiserror::Error;

/// What went wrong.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LowerErrorKind {
    #[error("record `{record}` has more than one field named `{field}`")]
    DuplicateFieldName { record: String, field: String },

    #[error("constant `{name}` depends on itself")]
    CyclicConstant { name: String },

    #[error("cannot find function `{name}`")]
    UnknownFunction { name: String },

    #[error("no `{capability}` implementation for `{receiver}`")]
    UnresolvedCapability { capability: String, receiver: String },

    #[error("{candidates} `{capability}` implementations match `{receiver}`")]
    AmbiguousCapability {
        capability: String,
        receiver: String,
        candidates: usize,
    },

    #[error("call to `{name}` matches {candidates} overloads")]
    AmbiguousOverload { name: String, candidates: usize },

    #[error("cannot find constant `{name}`")]
    UnknownConstant { name: String },

    #[error("reference to `{name}` matches {candidates} constants")]
    AmbiguousConstant { name: String, candidates: usize },

    #[error("cannot find local `{name}` in this scope")]
    UnknownLocal { name: String },

    #[error("`{ty}` has no field `{field}`")]
    UnknownField { ty: String, field: String },

    #[error("missing field `{field}` in `{record}`")]
    MissingField { record: String, field: String },

    #[error("`{name}` takes {expected} arguments but {found} were supplied")]
    ArgCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{literal} literal where `{expected}` is required")]
    TypeMismatchLiteral {
        literal: &'static str,
        expected: String,
    },

    #[error("literal `{value}` does not fit in `{ty}`")]
    LiteralOutOfRange { value: i128, ty: NumericType },

    #[error("cannot infer the type of this literal")]
    AmbiguousLiteral,

    #[error("exponent of an `{base}` power must be a non-negative integer")]
    InvalidExponent { base: NumericType },

    #[error("expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },

    #[error("could not find a free name for `{name}`")]
    RenamerCycle { name: String },
}

impl LowerErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LowerErrorKind::DuplicateFieldName { .. } => ErrorCode::E1001,
            LowerErrorKind::CyclicConstant { .. } => ErrorCode::E1002,
            LowerErrorKind::UnknownFunction { .. } => ErrorCode::E2001,
            LowerErrorKind::UnresolvedCapability { .. } => ErrorCode::E2002,
            LowerErrorKind::AmbiguousCapability { .. } => ErrorCode::E2003,
            LowerErrorKind::AmbiguousOverload { .. } => ErrorCode::E2004,
            LowerErrorKind::UnknownConstant { .. } => ErrorCode::E2005,
            LowerErrorKind::AmbiguousConstant { .. } => ErrorCode::E2006,
            LowerErrorKind::UnknownLocal { .. } => ErrorCode::E2007,
            LowerErrorKind::UnknownField { .. } => ErrorCode::E2008,
            LowerErrorKind::MissingField { .. } => ErrorCode::E2009,
            LowerErrorKind::ArgCountMismatch { .. } => ErrorCode::E2010,
            LowerErrorKind::TypeMismatchLiteral { .. } => ErrorCode::E3001,
            LowerErrorKind::LiteralOutOfRange { .. } => ErrorCode::E3002,
            LowerErrorKind::AmbiguousLiteral => ErrorCode::E3003,
            LowerErrorKind::InvalidExponent { .. } => ErrorCode::E3004,
            LowerErrorKind::TypeMismatch { .. } => ErrorCode::E3005,
            LowerErrorKind::RenamerCycle { .. } => ErrorCode::E9001,
        }
    }
}

/// A lowering error with its location.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind}")]
pub struct LowerError {
    pub kind: LowerErrorKind,
    pub span: Span,
    /// Declaration being lowered when the error was raised.
    pub origin: Option<DeclId>,
}

impl LowerError {
    pub fn new(kind: LowerErrorKind, span: Span) -> Self {
        LowerError {
            kind,
            span,
            origin: None,
        }
    }

    /// Attribute the error to `decl`, keeping an innermost origin if one is set.
    #[must_use]
    pub fn in_decl(mut self, decl: DeclId) -> Self {
        self.origin.get_or_insert(decl);
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Convert to a diagnostic with a hint where one helps.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.kind.to_string());
        let diag = self.describe(diag);
        if self.code().is_internal() {
            diag.with_note("this is a bug in the lowering engine")
        } else {
            diag
        }
    }

    fn describe(&self, diag: Diagnostic) -> Diagnostic {
        match &self.kind {
            LowerErrorKind::UnresolvedCapability {
                capability,
                receiver,
            } => diag
                .with_label(self.span, format!("`{receiver}` has no `{capability}`"))
                .with_note(format!(
                    "declare a function `{capability}` whose first parameter is `{receiver}`"
                )),
            LowerErrorKind::AmbiguousCapability { .. } | LowerErrorKind::AmbiguousOverload { .. } => diag
                .with_label(self.span, "ambiguous call")
                .with_note("annotate the arguments so exactly one candidate accepts them"),
            LowerErrorKind::AmbiguousConstant { .. } => diag
                .with_label(self.span, "ambiguous reference")
                .with_note("annotate the reference with the constant's type"),
            LowerErrorKind::TypeMismatchLiteral { expected, .. } => diag
                .with_label(self.span, format!("expected a `{expected}` literal"))
                .with_note("numeric constructors only accept numeric values"),
            LowerErrorKind::LiteralOutOfRange { ty, .. } => {
                let range = ty
                    .int_range()
                    .map(|(min, max)| format!("`{ty}` holds {min} to {max}"));
                let diag = diag.with_label(self.span, "out of range");
                match range {
                    Some(note) => diag.with_note(note),
                    None => diag,
                }
            }
            LowerErrorKind::AmbiguousLiteral => diag
                .with_label(self.span, "type annotation needed")
                .with_note("wrap the literal in a numeric constructor such as `int32(..)`"),
            LowerErrorKind::ArgCountMismatch {
                expected, found, ..
            } => diag.with_label(
                self.span,
                if found > expected {
                    "remove extra arguments"
                } else {
                    "add missing arguments"
                },
            ),
            LowerErrorKind::RenamerCycle { .. } => {
                diag.with_label(self.span, "while naming this declaration")
            }
            _ => diag.with_label(self.span, self.kind.to_string()),
        }
    }
}
