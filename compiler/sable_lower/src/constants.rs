//! Constant materialization.
//!
//! Module-level constants leave lowering as `ConstRef` nodes. The target
//! has no notion of a resolved global reference, so this pass rewrites them
//! in the configured [`ConstantStyle`]:
//! - `Inline` replaces every reference with a fresh copy of the constant's
//!   lowered value and keeps the constant as a module binding
//! - `Accessor` turns every constant into a zero-argument function and every
//!   reference into a call to it
//!
//! Same-named constants stay separate declarations either way; the renamer
//! gives them distinct names. A constant whose value depends on itself is
//! rejected before either style runs, so the style never decides whether a
//! unit is accepted.

use sable_ir::visitor::{walk_expr, Visitor};
use sable_ir::{
    DeclId, DeclKind, Declaration, ExprArena, ExprId, ExprKind, ExprRange, FieldInit,
    StringInterner,
};

use crate::fold;
use crate::stack::ensure_sufficient_stack;
use crate::{ConstantStyle, LowerConfig, LowerError, LowerErrorKind};

#[tracing::instrument(level = "debug", skip_all, fields(style = ?config.constant_style))]
pub fn materialize(
    arena: &mut ExprArena,
    decls: &mut [Declaration],
    config: &LowerConfig,
    interner: &StringInterner,
) -> Result<(), LowerError> {
    let references: Vec<(ExprId, DeclId)> = arena
        .ids()
        .filter_map(|id| match *arena.kind(id) {
            ExprKind::ConstRef(target) => Some((id, target)),
            _ => None,
        })
        .collect();

    reject_cycles(arena, decls, interner)?;

    match config.constant_style {
        ConstantStyle::Inline => {
            let mut inliner = Inliner {
                arena,
                decls,
                interner,
            };
            for &(id, target) in &references {
                let copy = inliner.inline_value(target)?;
                let kind = *inliner.arena.kind(copy);
                inliner.arena.set_kind(id, kind);
            }
            tracing::debug!(references = references.len(), "inlined constants");

            if config.fold_constants {
                for root in decls.iter().filter_map(body_of) {
                    fold::fold_tree(arena, root);
                }
            }
        }
        ConstantStyle::Accessor => {
            let mut accessors = 0usize;
            for decl in decls.iter_mut() {
                if let DeclKind::Constant { ty, value } = decl.kind {
                    let ret = ty.or_else(|| arena.ty(value)).unwrap_or(sable_ir::Type::Unit);
                    decl.kind = DeclKind::Function {
                        params: Vec::new(),
                        ret,
                        body: value,
                    };
                    accessors += 1;
                }
            }
            for &(id, target) in &references {
                arena.set_kind(
                    id,
                    ExprKind::CallDecl {
                        target,
                        args: ExprRange::EMPTY,
                    },
                );
            }
            tracing::debug!(accessors, references = references.len(), "materialized accessors");
        }
    }
    Ok(())
}

/// Root expression of a function body or constant value.
pub(crate) fn body_of(decl: &Declaration) -> Option<ExprId> {
    match decl.kind {
        DeclKind::Function { body, .. } => Some(body),
        DeclKind::Constant { value, .. } => Some(value),
        DeclKind::Extern { .. } | DeclKind::Record { .. } => None,
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Fail with `CyclicConstant` if any constant's value reaches itself
/// through `ConstRef`s.
fn reject_cycles(
    arena: &ExprArena,
    decls: &[Declaration],
    interner: &StringInterner,
) -> Result<(), LowerError> {
    let mut marks = vec![Mark::Unvisited; decls.len()];
    for (index, decl) in decls.iter().enumerate() {
        if decl.is_constant() {
            visit_constant(DeclId::from_index(index), arena, decls, interner, &mut marks)?;
        }
    }
    Ok(())
}

fn visit_constant(
    id: DeclId,
    arena: &ExprArena,
    decls: &[Declaration],
    interner: &StringInterner,
    marks: &mut [Mark],
) -> Result<(), LowerError> {
    match marks[id.index()] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            let decl = &decls[id.index()];
            return Err(LowerError::new(
                LowerErrorKind::CyclicConstant {
                    name: interner.lookup(decl.name).to_string(),
                },
                decl.span,
            )
            .in_decl(id));
        }
        Mark::Unvisited => {}
    }
    let DeclKind::Constant { value, .. } = decls[id.index()].kind else {
        return Ok(());
    };
    marks[id.index()] = Mark::Visiting;
    let mut refs = ConstRefs(Vec::new());
    refs.visit_expr(value, arena);
    for target in refs.0 {
        ensure_sufficient_stack(|| visit_constant(target, arena, decls, interner, marks))?;
    }
    marks[id.index()] = Mark::Done;
    Ok(())
}

/// Targets of every `ConstRef` below a root.
struct ConstRefs(Vec<DeclId>);

impl Visitor for ConstRefs {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        if let ExprKind::ConstRef(target) = *arena.kind(id) {
            self.0.push(target);
        }
        ensure_sufficient_stack(|| walk_expr(self, id, arena));
    }
}

struct Inliner<'a> {
    arena: &'a mut ExprArena,
    decls: &'a [Declaration],
    interner: &'a StringInterner,
}

impl Inliner<'_> {
    /// A fresh copy of `target`'s value with every nested reference
    /// expanded as well. Terminates because cycles were rejected.
    fn inline_value(&mut self, target: DeclId) -> Result<ExprId, LowerError> {
        let decl = &self.decls[target.index()];
        let DeclKind::Constant { value, .. } = decl.kind else {
            return Err(LowerError::new(
                LowerErrorKind::UnknownConstant {
                    name: self.interner.lookup(decl.name).to_string(),
                },
                decl.span,
            ));
        };
        self.copy(value)
    }

    fn copy(&mut self, id: ExprId) -> Result<ExprId, LowerError> {
        ensure_sufficient_stack(|| self.copy_inner(id))
    }

    fn copy_inner(&mut self, id: ExprId) -> Result<ExprId, LowerError> {
        let kind = match *self.arena.kind(id) {
            ExprKind::ConstRef(target) => return self.inline_value(target),
            kind @ (ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::Bool(_)
            | ExprKind::Str(_)
            | ExprKind::Unit
            | ExprKind::Local(_)
            | ExprKind::Global(_)) => kind,
            ExprKind::Field { receiver, field } => ExprKind::Field {
                receiver: self.copy(receiver)?,
                field,
            },
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op,
                operand: self.copy(operand)?,
            },
            ExprKind::Binary { op, left, right } => ExprKind::Binary {
                op,
                left: self.copy(left)?,
                right: self.copy(right)?,
            },
            ExprKind::OpCall { op, args } => ExprKind::OpCall {
                op,
                args: self.copy_list(args)?,
            },
            ExprKind::FloorOf(value) => ExprKind::FloorOf(self.copy(value)?),
            ExprKind::Call { callee, args } => ExprKind::Call {
                callee,
                args: self.copy_list(args)?,
            },
            ExprKind::CallDecl { target, args } => ExprKind::CallDecl {
                target,
                args: self.copy_list(args)?,
            },
            ExprKind::Convert { to, value } => ExprKind::Convert {
                to,
                value: self.copy(value)?,
            },
            ExprKind::Construct { record, fields } => {
                let inits = self.arena.get_field_inits(fields).to_vec();
                let copied = inits
                    .into_iter()
                    .map(|init| {
                        Ok(FieldInit {
                            name: init.name,
                            value: self.copy(init.value)?,
                        })
                    })
                    .collect::<Result<Vec<_>, LowerError>>()?;
                ExprKind::Construct {
                    record,
                    fields: self.arena.push_field_inits(&copied),
                }
            }
            ExprKind::Let { name, ty, value } => ExprKind::Let {
                name,
                ty,
                value: self.copy(value)?,
            },
            ExprKind::Block { exprs } => ExprKind::Block {
                exprs: self.copy_list(exprs)?,
            },
        };
        let span = self.arena.span(id);
        Ok(match self.arena.ty(id) {
            Some(ty) => self.arena.alloc_typed(kind, span, ty),
            None => self.arena.alloc(kind, span),
        })
    }

    fn copy_list(&mut self, range: ExprRange) -> Result<ExprRange, LowerError> {
        let ids = self.arena.get_expr_list(range).to_vec();
        let copied = ids
            .into_iter()
            .map(|id| self.copy(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.arena.push_expr_list(&copied))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
