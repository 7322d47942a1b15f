//! Simplification passes over a lowered unit.
//!
//! Every pass is switched on through [`LowerConfig`] and runs after
//! constant materialization, before renaming:
//! 1. **Inlining** (`inline`): calls to forwarding functions go straight to
//!    the function they forward to
//! 2. **Locals** (`locals`): `let` bindings nothing reads are dropped
//! 3. **Reachability** (`reachability`): declarations no entry point reaches
//!    are dropped and the rest renumbered
//!
//! Entry points are never inlined away, so their signatures survive every
//! pass. Parameters are never trimmed: a capability implementation is
//! found by its parameter list, and dropping one would change which calls
//! dispatch to it.

mod inline;
mod locals;
mod reachability;

use rustc_hash::FxHashSet;

use sable_ir::{DeclId, Declaration, ExprArena, StringInterner};

use crate::LowerConfig;

/// A unit after simplification.
pub(crate) struct Simplified {
    pub arena: ExprArena,
    pub decls: Vec<Declaration>,
    /// Input `DeclId` of each surviving declaration, by new index.
    pub origins: Vec<DeclId>,
}

impl Simplified {
    fn unchanged(arena: ExprArena, decls: Vec<Declaration>) -> Self {
        let origins = (0..decls.len()).map(DeclId::from_index).collect();
        Simplified {
            arena,
            decls,
            origins,
        }
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(decls = decls.len()))]
pub(crate) fn simplify(
    mut arena: ExprArena,
    decls: Vec<Declaration>,
    config: &LowerConfig,
    interner: &StringInterner,
) -> Simplified {
    let entries: FxHashSet<DeclId> = decls
        .iter()
        .enumerate()
        .filter(|(_, decl)| config.is_entry_point(interner.lookup(decl.name)))
        .map(|(index, _)| DeclId::from_index(index))
        .collect();

    if config.inline_trivial {
        let inlined = inline::inline_calls(&mut arena, &decls, &entries);
        tracing::debug!(inlined, "inlined forwarding calls");
    }
    if config.trim_locals {
        let trimmed = locals::trim_unread(&mut arena, &decls);
        tracing::debug!(trimmed, "trimmed unread locals");
    }
    if config.remove_unreachable {
        if entries.is_empty() {
            tracing::debug!("no entry points; keeping every declaration");
        } else {
            return reachability::retain_reachable(&arena, decls, &entries);
        }
    }
    Simplified::unchanged(arena, decls)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
