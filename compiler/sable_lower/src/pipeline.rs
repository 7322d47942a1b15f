//! Unit-level driver.
//!
//! One [`lower_unit`] call owns every piece of per-unit state: its symbol
//! table, capability index, output arena and renamer. Nothing is shared
//! between units except the interner, so [`lower_units`] can hand each unit
//! to its own rayon task.

use rayon::prelude::*;

use sable_ir::{
    CompilationUnit, DeclId, Declaration, ExprArena, ExprId, Name, StringInterner,
};

use crate::constants;
use crate::dispatch::CapabilityIndex;
use crate::lower::Lowerer;
use crate::operators::{ExplicitCall, Infix};
use crate::rename::{self, Binding};
use crate::render;
use crate::simplify::{self, Simplified};
use crate::symbols::SymbolTable;
use crate::{LowerConfig, LowerError, OperatorStyle};

/// A lowered compilation unit.
///
/// Declarations keep their input order. Unless unreachable declarations
/// were removed, a `DeclId` from the input unit names the same declaration
/// here; otherwise IDs are dense and [`Self::origin`] maps them back.
#[derive(Clone, Debug, PartialEq)]
pub struct LoweredUnit {
    arena: ExprArena,
    decls: Vec<Declaration>,
    bindings: Vec<Binding>,
    origins: Vec<DeclId>,
}

impl LoweredUnit {
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Declarations under their base names. See [`Self::emitted_name`].
    pub fn decls(&self) -> &[Declaration] {
        &self.decls
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub fn iter_decls(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.bindings.iter().map(|b| (b.decl, &self.decls[b.decl.index()]))
    }

    /// One binding per declaration, in declaration order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Input `DeclId` of the declaration now at `id`.
    pub fn origin(&self, id: DeclId) -> DeclId {
        self.origins[id.index()]
    }

    /// Name `id` is emitted under.
    pub fn emitted_name(&self, id: DeclId) -> Name {
        self.bindings[id.index()].emitted
    }

    /// Declaration emitted under `name`. Externs share their name with
    /// nothing else, so at most one declaration matches.
    pub fn decl_by_emitted(&self, name: Name) -> Option<DeclId> {
        self.bindings
            .iter()
            .find(|b| b.emitted == name)
            .map(|b| b.decl)
    }

    /// Root expression of a function body or constant value.
    pub fn body(&self, id: DeclId) -> Option<ExprId> {
        constants::body_of(self.decl(id))
    }

    fn emitted_names(&self) -> Vec<Name> {
        self.bindings.iter().map(|b| b.emitted).collect()
    }

    pub fn render_expr(&self, id: ExprId, interner: &StringInterner) -> String {
        render::render_expr(&self.arena, id, &self.emitted_names(), interner)
    }

    pub fn render_decl(&self, id: DeclId, interner: &StringInterner) -> String {
        render::render_decl(
            &self.arena,
            self.decl(id),
            self.emitted_name(id),
            &self.emitted_names(),
            interner,
        )
    }

    /// Back to input form, with emitted names as the new base names.
    pub fn into_unit(self) -> CompilationUnit {
        let LoweredUnit {
            arena,
            mut decls,
            bindings,
            ..
        } = self;
        for binding in bindings {
            decls[binding.decl.index()].name = binding.emitted;
        }
        CompilationUnit { arena, decls }
    }
}

/// Lower one unit: define, index capabilities, lower bodies, materialize
/// constants, simplify, rename.
#[tracing::instrument(level = "debug", skip_all, fields(decls = unit.decls.len()))]
pub fn lower_unit(
    unit: CompilationUnit,
    config: &LowerConfig,
    interner: &StringInterner,
) -> Result<LoweredUnit, LowerError> {
    let CompilationUnit { arena: src, decls } = unit;

    let mut symbols = SymbolTable::new();
    for decl in decls {
        symbols.define(decl, interner)?;
    }
    let capabilities = CapabilityIndex::build(&symbols);

    let (mut arena, mut decls) = match config.operator_style {
        OperatorStyle::Infix => {
            Lowerer::<Infix>::new(&src, &symbols, &capabilities, interner, config).lower_decls()?
        }
        OperatorStyle::ExplicitCall => {
            Lowerer::<ExplicitCall>::new(&src, &symbols, &capabilities, interner, config)
                .lower_decls()?
        }
    };
    constants::materialize(&mut arena, &mut decls, config, interner)?;
    let Simplified {
        arena,
        decls,
        origins,
    } = simplify::simplify(arena, decls, config, interner);
    let bindings = rename::rename(&decls, config, interner).map_err(|mut err| {
        err.origin = err.origin.map(|id| origins[id.index()]);
        err
    })?;

    let lowered = LoweredUnit {
        arena,
        decls,
        bindings,
        origins,
    };
    if tracing::enabled!(tracing::Level::TRACE) {
        for binding in lowered.bindings() {
            tracing::trace!(decl = %lowered.render_decl(binding.decl, interner), "lowered");
        }
    }
    Ok(lowered)
}

/// Lower independent units in parallel. Results keep the input order.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn lower_units(
    units: Vec<CompilationUnit>,
    config: &LowerConfig,
    interner: &StringInterner,
) -> Vec<Result<LoweredUnit, LowerError>> {
    units
        .into_par_iter()
        .map(|unit| lower_unit(unit, config, interner))
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
