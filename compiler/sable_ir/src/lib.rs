//! Sable IR - declaration and expression types for the lowering engine.
//!
//! This crate holds everything the passes in `sable_lower` read and write:
//! - Interned names and the string interner
//! - Spans for source locations
//! - Semantic types, including the closed set of fixed-width numeric types
//! - Operators in infix and explicit named-call form
//! - The flat expression arena and its node kinds
//! - Declarations and compilation units
//! - A read-only visitor over expression trees
//!
//! # Design
//!
//! - **Intern everything**: identifiers and string literals are `Name(u32)`.
//! - **Flatten everything**: children are `ExprId(u32)` indices, lists are
//!   ranges into side tables.
//! - **One shape in, one shape out**: lowering consumes and produces the same
//!   types, so its output can be fed back in.
//!
//! Floats are stored as `u64` bits so every node derives `Eq` and `Hash`.

mod arena;
mod decl;
mod expr;
mod expr_id;
mod interner;
mod name;
mod operators;
mod span;
mod types;
mod unit;
pub mod visitor;

pub use arena::ExprArena;
pub use decl::{DeclId, DeclKind, Declaration, Field, Param};
pub use expr::{ExprKind, FieldInit};
pub use expr_id::{ExprId, ExprRange, FieldInitRange};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use operators::{BinaryOp, NamedOp, Operator, UnaryOp};
pub use span::Span;
pub use types::{NumericType, Type};
pub use unit::CompilationUnit;
