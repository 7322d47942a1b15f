//! Expression tree traversal.
//!
//! A [`Visitor`] walks the expressions below one root. Override
//! [`Visitor::visit_expr`] to act on a node and call [`walk_expr`] from it
//! to continue into the node's children. The arena is never mutated.

use crate::{ExprArena, ExprId, ExprKind};

pub trait Visitor {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        walk_expr(self, id, arena);
    }
}

/// Visit every direct child of `id`, in evaluation order.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, id: ExprId, arena: &ExprArena) {
    match *arena.kind(id) {
        ExprKind::Field { receiver: child, .. }
        | ExprKind::Unary { operand: child, .. }
        | ExprKind::FloorOf(child)
        | ExprKind::Convert { value: child, .. }
        | ExprKind::Let { value: child, .. } => visitor.visit_expr(child, arena),
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(left, arena);
            visitor.visit_expr(right, arena);
        }
        ExprKind::OpCall { args, .. }
        | ExprKind::Call { args, .. }
        | ExprKind::CallDecl { args, .. }
        | ExprKind::Block { exprs: args } => {
            for &child in arena.get_expr_list(args) {
                visitor.visit_expr(child, arena);
            }
        }
        ExprKind::Construct { fields, .. } => {
            for init in arena.get_field_inits(fields) {
                visitor.visit_expr(init.value, arena);
            }
        }
        ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Bool(_)
        | ExprKind::Str(_)
        | ExprKind::Unit
        | ExprKind::Local(_)
        | ExprKind::Global(_)
        | ExprKind::ConstRef(_) => {}
    }
}

#[cfg(test)]
mod tests;
