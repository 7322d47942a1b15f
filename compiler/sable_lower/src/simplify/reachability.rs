//! Reachability from the entry points.
//!
//! A declaration is live when an entry point reaches it through a call, a
//! constant reference, a record construction, or a record type anywhere in
//! a signature, field, binding or expression. Live declarations keep their
//! relative order and are renumbered densely; their bodies are copied into
//! a fresh arena so nothing of a dropped declaration survives.

use rustc_hash::FxHashSet;

use sable_ir::visitor::{walk_expr, Visitor};
use sable_ir::{
    DeclId, DeclKind, Declaration, ExprArena, ExprId, ExprKind, ExprRange, Field, FieldInit, Param,
    Type,
};

use super::Simplified;
use crate::constants::body_of;
use crate::stack::ensure_sufficient_stack;

pub(super) fn retain_reachable(
    arena: &ExprArena,
    decls: Vec<Declaration>,
    entries: &FxHashSet<DeclId>,
) -> Simplified {
    let live = live_decls(arena, &decls, entries);

    let mut remap: Vec<Option<DeclId>> = vec![None; decls.len()];
    let mut origins = Vec::with_capacity(live.len());
    for (index, slot) in remap.iter_mut().enumerate() {
        let id = DeclId::from_index(index);
        if live.contains(&id) {
            *slot = Some(DeclId::from_index(origins.len()));
            origins.push(id);
        }
    }
    tracing::debug!(
        kept = origins.len(),
        dropped = decls.len() - origins.len(),
        "removed unreachable declarations"
    );

    let mut compactor = Compactor {
        src: arena,
        out: ExprArena::new(),
        remap: &remap,
    };
    let kept = decls
        .into_iter()
        .zip(&remap)
        .filter(|(_, slot)| slot.is_some())
        .map(|(decl, _)| compactor.decl(decl))
        .collect();

    Simplified {
        arena: compactor.out,
        decls: kept,
        origins,
    }
}

fn live_decls(
    arena: &ExprArena,
    decls: &[Declaration],
    entries: &FxHashSet<DeclId>,
) -> FxHashSet<DeclId> {
    let mut live: FxHashSet<DeclId> = entries.clone();
    let mut worklist: Vec<DeclId> = entries.iter().copied().collect();
    while let Some(id) = worklist.pop() {
        let mut refs = References(Vec::new());
        refs.decl(&decls[id.index()], arena);
        for target in refs.0 {
            if live.insert(target) {
                worklist.push(target);
            }
        }
    }
    live
}

/// Declarations one declaration refers to.
struct References(Vec<DeclId>);

impl References {
    fn ty(&mut self, ty: Type) {
        if let Type::Record(id) = ty {
            self.0.push(id);
        }
    }

    fn decl(&mut self, decl: &Declaration, arena: &ExprArena) {
        match &decl.kind {
            DeclKind::Function { params, ret, .. } | DeclKind::Extern { params, ret } => {
                params.iter().for_each(|param| self.ty(param.ty));
                self.ty(*ret);
            }
            DeclKind::Record { fields } => fields.iter().for_each(|field| self.ty(field.ty)),
            DeclKind::Constant { ty, .. } => {
                if let Some(ty) = ty {
                    self.ty(*ty);
                }
            }
        }
        if let Some(root) = body_of(decl) {
            self.visit_expr(root, arena);
        }
    }
}

impl Visitor for References {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        if let Some(ty) = arena.ty(id) {
            self.ty(ty);
        }
        match *arena.kind(id) {
            ExprKind::CallDecl { target, .. } | ExprKind::ConstRef(target) => self.0.push(target),
            ExprKind::Construct { record, .. } => self.0.push(record),
            ExprKind::Let { ty: Some(ty), .. } => self.ty(ty),
            _ => {}
        }
        ensure_sufficient_stack(|| walk_expr(self, id, arena));
    }
}

/// Copies live bodies into a fresh arena under the new numbering.
struct Compactor<'a> {
    src: &'a ExprArena,
    out: ExprArena,
    /// New ID of each input declaration; `None` once dropped.
    remap: &'a [Option<DeclId>],
}

impl Compactor<'_> {
    fn id(&self, id: DeclId) -> DeclId {
        // Everything a live declaration refers to is live.
        self.remap[id.index()].unwrap_or(id)
    }

    fn ty(&self, ty: Type) -> Type {
        match ty {
            Type::Record(id) => Type::Record(self.id(id)),
            other => other,
        }
    }

    fn params(&self, params: Vec<Param>) -> Vec<Param> {
        params
            .into_iter()
            .map(|param| Param {
                ty: self.ty(param.ty),
                ..param
            })
            .collect()
    }

    fn decl(&mut self, decl: Declaration) -> Declaration {
        let kind = match decl.kind {
            DeclKind::Function { params, ret, body } => DeclKind::Function {
                params: self.params(params),
                ret: self.ty(ret),
                body: self.copy(body),
            },
            DeclKind::Extern { params, ret } => DeclKind::Extern {
                params: self.params(params),
                ret: self.ty(ret),
            },
            DeclKind::Record { fields } => DeclKind::Record {
                fields: fields
                    .into_iter()
                    .map(|field| Field {
                        ty: self.ty(field.ty),
                        ..field
                    })
                    .collect(),
            },
            DeclKind::Constant { ty, value } => DeclKind::Constant {
                ty: ty.map(|ty| self.ty(ty)),
                value: self.copy(value),
            },
        };
        Declaration { kind, ..decl }
    }

    fn copy(&mut self, id: ExprId) -> ExprId {
        ensure_sufficient_stack(|| self.copy_inner(id))
    }

    fn copy_inner(&mut self, id: ExprId) -> ExprId {
        let src = self.src;
        let kind = match *src.kind(id) {
            kind @ (ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::Bool(_)
            | ExprKind::Str(_)
            | ExprKind::Unit
            | ExprKind::Local(_)
            | ExprKind::Global(_)) => kind,
            ExprKind::ConstRef(target) => ExprKind::ConstRef(self.id(target)),
            ExprKind::Field { receiver, field } => ExprKind::Field {
                receiver: self.copy(receiver),
                field,
            },
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op,
                operand: self.copy(operand),
            },
            ExprKind::Binary { op, left, right } => ExprKind::Binary {
                op,
                left: self.copy(left),
                right: self.copy(right),
            },
            ExprKind::OpCall { op, args } => ExprKind::OpCall {
                op,
                args: self.copy_list(args),
            },
            ExprKind::FloorOf(value) => ExprKind::FloorOf(self.copy(value)),
            ExprKind::Call { callee, args } => ExprKind::Call {
                callee,
                args: self.copy_list(args),
            },
            ExprKind::CallDecl { target, args } => ExprKind::CallDecl {
                target: self.id(target),
                args: self.copy_list(args),
            },
            ExprKind::Convert { to, value } => ExprKind::Convert {
                to,
                value: self.copy(value),
            },
            ExprKind::Construct { record, fields } => {
                let inits: Vec<FieldInit> = src
                    .get_field_inits(fields)
                    .iter()
                    .map(|init| FieldInit {
                        name: init.name,
                        value: self.copy(init.value),
                    })
                    .collect();
                ExprKind::Construct {
                    record: self.id(record),
                    fields: self.out.push_field_inits(&inits),
                }
            }
            ExprKind::Let { name, ty, value } => ExprKind::Let {
                name,
                ty: ty.map(|ty| self.ty(ty)),
                value: self.copy(value),
            },
            ExprKind::Block { exprs } => ExprKind::Block {
                exprs: self.copy_list(exprs),
            },
        };
        let span = src.span(id);
        match src.ty(id) {
            Some(ty) => self.out.alloc_typed(kind, span, self.ty(ty)),
            None => self.out.alloc(kind, span),
        }
    }

    fn copy_list(&mut self, range: ExprRange) -> ExprRange {
        let src = self.src;
        let copied: Vec<ExprId> = src
            .get_expr_list(range)
            .iter()
            .map(|&id| self.copy(id))
            .collect();
        self.out.push_expr_list(&copied)
    }
}
