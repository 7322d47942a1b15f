//! Diagnostic system for lowering errors.
//!
//! Every diagnostic carries:
//! - an error code for searchability
//! - a message (what went wrong)
//! - a labeled span (where it went wrong)
//! - optional notes (why, and what to do about it)
//!
//! Rendering to a terminal belongs to the driver; this crate only builds
//! the structured value.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
