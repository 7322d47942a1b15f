//! Bottom-up type inference over input expressions.
//!
//! Lowering is top-down: a literal learns its type from its context. Some
//! contexts need to look at an operand before lowering it (which overload a
//! call picks, which side of an operator decides the type). Those ask
//! [`Lowerer::infer`], which answers without emitting anything.

use sable_ir::{BinaryOp, ExprId, ExprKind, Operator, Type, UnaryOp};

use super::calls::Callee;
use super::Lowerer;
use crate::coerce::Inferred;
use crate::operators::OperatorLowering;
use crate::stack::ensure_sufficient_stack;
use crate::{LowerError, LowerErrorKind};

impl<O: OperatorLowering> Lowerer<'_, O> {
    pub(super) fn infer(&mut self, id: ExprId) -> Result<Inferred, LowerError> {
        if let Some(&inferred) = self.inferred.get(&id) {
            return Ok(inferred);
        }
        let inferred = ensure_sufficient_stack(|| self.infer_inner(id))?;
        self.inferred.insert(id, inferred);
        Ok(inferred)
    }

    fn infer_inner(&mut self, id: ExprId) -> Result<Inferred, LowerError> {
        let span = self.src.span(id);
        let known = |ty: Type| -> Result<Inferred, LowerError> { Ok(Inferred::Known(ty)) };
        match *self.src.kind(id) {
            ExprKind::Int(_) => Ok(self.src.ty(id).map_or(Inferred::IntLiteral, Inferred::Known)),
            ExprKind::Float(_) => {
                Ok(self.src.ty(id).map_or(Inferred::FloatLiteral, Inferred::Known))
            }
            ExprKind::Bool(_) => known(Type::Bool),
            ExprKind::Str(_) => known(Type::Str),
            ExprKind::Unit | ExprKind::Let { .. } => known(Type::Unit),

            ExprKind::Local(name) => self.lookup_local(name).map(Inferred::Known).ok_or_else(|| {
                LowerError::new(
                    LowerErrorKind::UnknownLocal {
                        name: self.name(name),
                    },
                    span,
                )
            }),
            ExprKind::Global(name) => {
                let target = self.resolve_global(name, self.src.ty(id), span)?;
                Ok(Inferred::Known(self.constant_type(target)?))
            }
            ExprKind::ConstRef(target) => Ok(Inferred::Known(self.constant_type(target)?)),
            ExprKind::Field { receiver, field } => {
                let receiver = match self.infer(receiver)? {
                    Inferred::Known(ty) => ty,
                    // Literals have no fields.
                    Inferred::IntLiteral | Inferred::FloatLiteral => Type::Unit,
                };
                self.field_type(receiver, field, span).map(Inferred::Known)
            }

            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => self.infer(operand),
            ExprKind::Unary {
                op: UnaryOp::Not, ..
            } => known(Type::Bool),
            ExprKind::Binary { op, left, right } => self.infer_binary(op, left, right),
            ExprKind::OpCall { op, args } => match (op.operator(), self.src.get_expr_list(args)) {
                (Operator::Binary(op), &[left, right]) => self.infer_binary(op, left, right),
                (Operator::Unary(UnaryOp::Neg), &[operand]) => self.infer(operand),
                (Operator::Unary(UnaryOp::Not), _) => known(Type::Bool),
                (_, args) => Err(LowerError::new(
                    LowerErrorKind::ArgCountMismatch {
                        name: format!("op.{}", op.name()),
                        expected: op.arity(),
                        found: args.len(),
                    },
                    span,
                )),
            },
            ExprKind::FloorOf(value) => self.infer(value),

            ExprKind::Call { callee, args } => {
                let args = self.src.get_expr_list(args);
                match self.resolve_call(callee, args, span)? {
                    Callee::Decl(target) => self.return_type(target, span).map(Inferred::Known),
                    Callee::Convert(to) => known(Type::Numeric(to)),
                }
            }
            ExprKind::CallDecl { target, .. } => {
                self.return_type(target, span).map(Inferred::Known)
            }
            ExprKind::Convert { to, .. } => known(Type::Numeric(to)),
            ExprKind::Construct { record, .. } => known(Type::Record(record)),

            ExprKind::Block { exprs } => {
                let exprs = self.src.get_expr_list(exprs);
                self.with_scope(|this| -> Result<Inferred, LowerError> {
                    let mut last = Inferred::Known(Type::Unit);
                    for &expr in exprs {
                        last = this.infer(expr)?;
                        if let ExprKind::Let { name, ty, value } = *this.src.kind(expr) {
                            let ty = match ty {
                                Some(ty) => ty,
                                None => this.infer(value)?.known().ok_or_else(|| {
                                    LowerError::new(
                                        LowerErrorKind::AmbiguousLiteral,
                                        this.src.span(value),
                                    )
                                })?,
                            };
                            this.bind_local(name, ty);
                        }
                    }
                    Ok(last)
                })
            }
        }
    }

    fn infer_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> Result<Inferred, LowerError> {
        if op.is_comparison() || op.is_logical() {
            return Ok(Inferred::Known(Type::Bool));
        }
        let left = self.infer(left)?;
        if let Inferred::Known(_) = left {
            return Ok(left);
        }
        Ok(left.join(self.infer(right)?))
    }
}
