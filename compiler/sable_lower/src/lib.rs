//! Lowering and specialization for the Sable compiler.
//!
//! Takes a [`CompilationUnit`](sable_ir::CompilationUnit) whose calls,
//! constants and literals are still unresolved and produces a
//! [`LoweredUnit`] a dynamically typed backend can print directly.
//!
//! # Pipeline Position
//!
//! ```text
//! Front-end → **Lower** → target printer
//! ```
//!
//! # What Happens During Lowering
//!
//! 1. **Symbols** (`symbols`): declarations registered by base name; records
//!    validated
//! 2. **Dispatch** (`dispatch`): capability calls on records resolved to one
//!    implementing function
//! 3. **Coercion** (`coerce`): every literal bound to a numeric type, explicit
//!    conversions inserted between mismatched operands
//! 4. **Operators** (`operators`): emitted infix or as `op.*` calls
//! 5. **Constants** (`constants`): references inlined or turned into accessor
//!    calls
//! 6. **Simplification** (`simplify`, opt-in): forwarding calls inlined,
//!    unread locals trimmed, declarations no entry point reaches dropped
//! 7. **Renaming** (`rename`): same-named and reserved declarations get
//!    deterministic suffixes
//!
//! The output converts back into an input unit with
//! [`LoweredUnit::into_unit`]; lowering it again changes nothing.

mod coerce;
mod config;
mod constants;
mod dispatch;
mod error;
mod fold;
mod lower;
mod operators;
mod pipeline;
mod render;
mod rename;
mod simplify;
mod stack;
mod symbols;

use std::sync::Once;

pub use coerce::Inferred;
pub use config::{ConstantStyle, LowerConfig, OperatorStyle, DEFAULT_RESERVED_NAMES};
pub use dispatch::CapabilityIndex;
pub use error::{LowerError, LowerErrorKind};
pub use operators::{ExplicitCall, Infix, OperatorLowering};
pub use pipeline::{lower_unit, lower_units, LoweredUnit};
pub use render::{render_decl, render_expr};
pub use rename::{rename, Binding};
pub use symbols::{Lookup, SymbolTable};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for the lowering passes.
///
/// Does nothing unless `RUST_LOG` is set; safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
