//! Unread-local trimming.
//!
//! A `let` inside a block is dropped when no expression of the same body
//! reads its name and its value makes no call. Dropping one binding can
//! leave another unread, so each body is rescanned until nothing changes.
//! The last expression of a block is its value and always stays.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use sable_ir::visitor::{walk_expr, Visitor};
use sable_ir::{Declaration, ExprArena, ExprId, ExprKind, Name};

use crate::constants::body_of;
use crate::stack::ensure_sufficient_stack;

/// Trim every body. Returns how many bindings were dropped.
pub(super) fn trim_unread(arena: &mut ExprArena, decls: &[Declaration]) -> usize {
    decls
        .iter()
        .filter_map(body_of)
        .map(|root| trim_body(arena, root))
        .sum()
}

fn trim_body(arena: &mut ExprArena, root: ExprId) -> usize {
    let mut trimmed = 0;
    loop {
        let mut scan = Scan::default();
        scan.visit_expr(root, arena);

        let mut changed = false;
        for block in scan.blocks {
            let ExprKind::Block { exprs } = *arena.kind(block) else {
                continue;
            };
            let exprs = arena.get_expr_list(exprs);
            let last = exprs.len().saturating_sub(1);
            let kept: SmallVec<[ExprId; 8]> = exprs
                .iter()
                .enumerate()
                .filter(|&(i, &expr)| i == last || !is_dead_let(arena, expr, &scan.reads))
                .map(|(_, &expr)| expr)
                .collect();
            if kept.len() < exprs.len() {
                trimmed += exprs.len() - kept.len();
                let exprs = arena.push_expr_list(&kept);
                arena.set_kind(block, ExprKind::Block { exprs });
                changed = true;
            }
        }
        if !changed {
            return trimmed;
        }
    }
}

fn is_dead_let(arena: &ExprArena, expr: ExprId, reads: &FxHashSet<Name>) -> bool {
    let ExprKind::Let { name, value, .. } = *arena.kind(expr) else {
        return false;
    };
    if reads.contains(&name) {
        return false;
    }
    let mut calls = Calls(false);
    calls.visit_expr(value, arena);
    !calls.0
}

/// Names read and blocks found below one root.
#[derive(Default)]
struct Scan {
    reads: FxHashSet<Name>,
    blocks: Vec<ExprId>,
}

impl Visitor for Scan {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        match *arena.kind(id) {
            ExprKind::Local(name) => {
                self.reads.insert(name);
            }
            ExprKind::Block { .. } => self.blocks.push(id),
            _ => {}
        }
        ensure_sufficient_stack(|| walk_expr(self, id, arena));
    }
}

/// Whether anything below a root is a call.
struct Calls(bool);

impl Visitor for Calls {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        if self.0 {
            return;
        }
        if matches!(arena.kind(id), ExprKind::Call { .. } | ExprKind::CallDecl { .. }) {
            self.0 = true;
            return;
        }
        ensure_sufficient_stack(|| walk_expr(self, id, arena));
    }
}
