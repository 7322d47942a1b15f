//! Forwarding-call inlining.
//!
//! A function is a forwarder when its body does nothing but pass its
//! parameters on:
//! - `def f(a, b): g(b, a)` calls another declaration with every parameter
//!   exactly once, in any order
//! - `def f(a): a` hands back its only parameter
//!
//! A call to a forwarder is rewritten in place to what the forwarder would
//! do with the call's arguments. Arguments are never duplicated or dropped.
//! Their types already match: lowering wraps any mismatched local in a
//! `Convert`, and a wrapped local is not a forwarder body.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use sable_ir::{DeclId, DeclKind, Declaration, ExprArena, ExprId, ExprKind, Name, Param};

/// What a call to a forwarder turns into.
enum InlineHint {
    /// Call `target` with the caller's argument `params[i]` in position `i`.
    ReplaceCall {
        target: DeclId,
        params: SmallVec<[usize; 4]>,
    },
    /// The caller's argument at this position is the value.
    YieldParameter(usize),
}

fn hint(
    arena: &ExprArena,
    decls: &[Declaration],
    entries: &FxHashSet<DeclId>,
    id: DeclId,
) -> Option<InlineHint> {
    if entries.contains(&id) {
        return None;
    }
    let DeclKind::Function { params, body, .. } = &decls[id.index()].kind else {
        return None;
    };
    let body = sole_expr(arena, *body);
    match *arena.kind(body) {
        ExprKind::Local(name) if params.len() == 1 && params[0].name == name => {
            Some(InlineHint::YieldParameter(0))
        }
        ExprKind::CallDecl { target, args } => {
            let args = arena.get_expr_list(args);
            if args.len() != params.len() {
                return None;
            }
            let mut order: SmallVec<[usize; 4]> = SmallVec::new();
            for &arg in args {
                let ExprKind::Local(name) = *arena.kind(arg) else {
                    return None;
                };
                let position = param_position(params, name)?;
                if order.contains(&position) {
                    return None;
                }
                order.push(position);
            }
            Some(InlineHint::ReplaceCall {
                target,
                params: order,
            })
        }
        _ => None,
    }
}

/// `{ e }` and `e` forward alike.
fn sole_expr(arena: &ExprArena, body: ExprId) -> ExprId {
    match *arena.kind(body) {
        ExprKind::Block { exprs } => match arena.get_expr_list(exprs) {
            [only] => *only,
            _ => body,
        },
        _ => body,
    }
}

fn param_position(params: &[Param], name: Name) -> Option<usize> {
    params.iter().position(|param| param.name == name)
}

/// Rewrite every call to a forwarder. Returns how many calls changed.
pub(super) fn inline_calls(
    arena: &mut ExprArena,
    decls: &[Declaration],
    entries: &FxHashSet<DeclId>,
) -> usize {
    let calls: Vec<ExprId> = arena
        .ids()
        .filter(|&id| matches!(arena.kind(id), ExprKind::CallDecl { .. }))
        .collect();

    let mut inlined = 0;
    for id in calls {
        // Forwarders to forwarders are followed; `seen` stops at recursion.
        let mut seen: SmallVec<[DeclId; 4]> = SmallVec::new();
        while let ExprKind::CallDecl { target, args } = *arena.kind(id) {
            if seen.contains(&target) {
                break;
            }
            seen.push(target);
            let Some(hint) = hint(arena, decls, entries, target) else {
                break;
            };
            let actual = arena.get_expr_list(args).to_vec();
            match hint {
                InlineHint::ReplaceCall { target, params } => {
                    let swizzled: SmallVec<[ExprId; 4]> =
                        params.iter().map(|&position| actual[position]).collect();
                    let args = arena.push_expr_list(&swizzled);
                    arena.set_kind(id, ExprKind::CallDecl { target, args });
                }
                InlineHint::YieldParameter(position) => {
                    let kind = *arena.kind(actual[position]);
                    arena.set_kind(id, kind);
                }
            }
            inlined += 1;
        }
    }
    inlined
}
