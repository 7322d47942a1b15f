//! Literals, references, operators and sequencing.

use sable_ir::{BinaryOp, DeclId, ExprId, ExprKind, Operator, Span, Type, UnaryOp};

use super::Lowerer;
use crate::coerce::{self, bind_literal, bind_negated_literal, literal_description, Inferred};
use crate::operators::OperatorLowering;
use crate::symbols::Lookup;
use crate::{LowerError, LowerErrorKind};

impl<O: OperatorLowering> Lowerer<'_, O> {
    pub(super) fn lower_expr_inner(
        &mut self,
        id: ExprId,
        expected: Option<Type>,
    ) -> Result<ExprId, LowerError> {
        let span = self.src.span(id);
        let kind = *self.src.kind(id);
        match kind {
            ExprKind::Int(_) | ExprKind::Float(_) => self.lower_number(id, kind, expected),
            ExprKind::Bool(_) => Ok(self.out.alloc_typed(kind, span, Type::Bool)),
            ExprKind::Str(_) => Ok(self.out.alloc_typed(kind, span, Type::Str)),
            ExprKind::Unit => Ok(self.out.alloc_typed(kind, span, Type::Unit)),

            ExprKind::Local(name) => {
                let ty = self.lookup_local(name).ok_or_else(|| {
                    LowerError::new(
                        LowerErrorKind::UnknownLocal {
                            name: self.name(name),
                        },
                        span,
                    )
                })?;
                Ok(self.out.alloc_typed(kind, span, ty))
            }
            ExprKind::Global(name) => {
                let wanted = self.src.ty(id).or(expected);
                let target = self.resolve_global(name, wanted, span)?;
                self.const_ref(target, span)
            }
            ExprKind::ConstRef(target) => self.const_ref(target, span),
            ExprKind::Field { receiver, field } => {
                let receiver = self.lower_expr(receiver, None)?;
                let ty = self.field_type(self.out_ty(receiver), field, span)?;
                Ok(self
                    .out
                    .alloc_typed(ExprKind::Field { receiver, field }, span, ty))
            }

            ExprKind::Unary { op, operand } => self.lower_unary(op, operand, span, expected),
            ExprKind::Binary { op, left, right } => {
                self.lower_binary(op, (left, right), span, expected)
            }
            ExprKind::OpCall { op, args } => {
                let args = self.src.get_expr_list(args);
                match (op.operator(), args) {
                    (Operator::Binary(bin), &[left, right]) => {
                        self.lower_binary(bin, (left, right), span, expected)
                    }
                    (Operator::Unary(un), &[operand]) => {
                        self.lower_unary(un, operand, span, expected)
                    }
                    _ => Err(LowerError::new(
                        LowerErrorKind::ArgCountMismatch {
                            name: format!("op.{}", op.name()),
                            expected: op.arity(),
                            found: args.len(),
                        },
                        span,
                    )),
                }
            }
            ExprKind::FloorOf(value) => {
                let value = self.lower_expr(value, expected)?;
                let ty = self.out_ty(value);
                if !ty.is_numeric() {
                    return Err(LowerError::new(
                        LowerErrorKind::TypeMismatch {
                            expected: "a number".to_string(),
                            found: self.type_name(ty),
                        },
                        span,
                    ));
                }
                let floor = self.out.alloc_typed(ExprKind::FloorOf(value), span, ty);
                Ok(self.finish_op(floor))
            }

            ExprKind::Call { callee, args } => self.lower_call(callee, args, span),
            ExprKind::CallDecl { target, args } => {
                let args = self.src.get_expr_list(args);
                self.lower_call_decl(target, args, span)
            }
            ExprKind::Convert { to, value } => self.lower_convert(to, value, span),
            ExprKind::Construct { record, fields } => self.lower_construct(record, fields, span),

            ExprKind::Let { name, ty, value } => {
                let value = match ty {
                    Some(ty) => self.lower_to(value, ty)?,
                    None => self.lower_expr(value, None)?,
                };
                let ty = self.out_ty(value);
                self.bind_local(name, ty);
                Ok(self.out.alloc_typed(
                    ExprKind::Let {
                        name,
                        ty: Some(ty),
                        value,
                    },
                    span,
                    Type::Unit,
                ))
            }
            ExprKind::Block { exprs } => {
                let exprs = self.src.get_expr_list(exprs);
                let lowered = self.with_scope(|this| {
                    let last = exprs.len().saturating_sub(1);
                    exprs
                        .iter()
                        .enumerate()
                        .map(|(i, &e)| this.lower_expr(e, if i == last { expected } else { None }))
                        .collect::<Result<Vec<_>, _>>()
                })?;
                let ty = lowered.last().map_or(Type::Unit, |&last| self.out_ty(last));
                let exprs = self.out.push_expr_list(&lowered);
                Ok(self.out.alloc_typed(ExprKind::Block { exprs }, span, ty))
            }
        }
    }

    /// Bind a numeric literal to its annotation, or else to its context.
    fn lower_number(
        &mut self,
        id: ExprId,
        kind: ExprKind,
        expected: Option<Type>,
    ) -> Result<ExprId, LowerError> {
        let span = self.src.span(id);
        match self.src.ty(id).or(expected) {
            Some(Type::Numeric(ty)) => {
                let bound = bind_literal(kind, ty).map_err(|kind| LowerError::new(kind, span))?;
                Ok(self.out.alloc_typed(bound, span, Type::Numeric(ty)))
            }
            Some(other) => Err(LowerError::new(
                LowerErrorKind::TypeMismatchLiteral {
                    literal: literal_description(&kind),
                    expected: self.type_name(other),
                },
                span,
            )),
            None => Err(LowerError::new(LowerErrorKind::AmbiguousLiteral, span)),
        }
    }

    pub(super) fn resolve_global(
        &mut self,
        name: sable_ir::Name,
        wanted: Option<Type>,
        span: Span,
    ) -> Result<DeclId, LowerError> {
        let symbols = self.symbols;
        match symbols.resolve_constant(name, wanted, |c| self.constant_type(c))? {
            Lookup::Found(target) => Ok(target),
            Lookup::NotFound => Err(LowerError::new(
                LowerErrorKind::UnknownConstant {
                    name: self.name(name),
                },
                span,
            )),
            Lookup::NoMatch { candidates } | Lookup::Ambiguous { candidates } => {
                Err(LowerError::new(
                    LowerErrorKind::AmbiguousConstant {
                        name: self.name(name),
                        candidates,
                    },
                    span,
                ))
            }
        }
    }

    fn const_ref(&mut self, target: DeclId, span: Span) -> Result<ExprId, LowerError> {
        let ty = self.constant_type(target)?;
        Ok(self.out.alloc_typed(ExprKind::ConstRef(target), span, ty))
    }

    /// Type of field `field` on a value of type `receiver`.
    pub(super) fn field_type(
        &self,
        receiver: Type,
        field: sable_ir::Name,
        span: Span,
    ) -> Result<Type, LowerError> {
        receiver
            .as_record()
            .and_then(|record| self.symbols.decl(record).fields())
            .and_then(|fields| fields.iter().find(|f| f.name == field))
            .map(|f| f.ty)
            .ok_or_else(|| {
                LowerError::new(
                    LowerErrorKind::UnknownField {
                        ty: self.type_name(receiver),
                        field: self.name(field),
                    },
                    span,
                )
            })
    }

    fn lower_unary(
        &mut self,
        op: UnaryOp,
        operand: ExprId,
        span: Span,
        expected: Option<Type>,
    ) -> Result<ExprId, LowerError> {
        let (operand, ty) = match op {
            UnaryOp::Neg => {
                if let Some(literal) = self.lower_negated_literal(operand, span, expected)? {
                    return Ok(literal);
                }
                let operand = self.lower_expr(operand, expected.filter(|ty| ty.is_numeric()))?;
                let ty = self.out_ty(operand);
                if !ty.is_numeric() {
                    return Err(LowerError::new(
                        LowerErrorKind::TypeMismatch {
                            expected: "a number".to_string(),
                            found: self.type_name(ty),
                        },
                        span,
                    ));
                }
                (operand, ty)
            }
            UnaryOp::Not => (self.lower_to(operand, Type::Bool)?, Type::Bool),
        };
        let node = O::unary(&mut self.out, op, operand, span, ty);
        Ok(self.finish_op(node))
    }

    /// `-literal` in a numeric context binds as one negative literal, so the
    /// minimum of a signed type can be written.
    fn lower_negated_literal(
        &mut self,
        operand: ExprId,
        span: Span,
        expected: Option<Type>,
    ) -> Result<Option<ExprId>, LowerError> {
        let kind = *self.src.kind(operand);
        if !matches!(kind, ExprKind::Int(_) | ExprKind::Float(_)) {
            return Ok(None);
        }
        let Some(Type::Numeric(ty)) = self.src.ty(operand).or(expected) else {
            return Ok(None);
        };
        let bound = bind_negated_literal(kind, ty).map_err(|kind| LowerError::new(kind, span))?;
        Ok(Some(self.out.alloc_typed(bound, span, Type::Numeric(ty))))
    }

    fn lower_binary(
        &mut self,
        op: BinaryOp,
        (left, right): (ExprId, ExprId),
        span: Span,
        expected: Option<Type>,
    ) -> Result<ExprId, LowerError> {
        if op.is_logical() {
            let left = self.lower_to(left, Type::Bool)?;
            let right = self.lower_to(right, Type::Bool)?;
            let node = O::binary(&mut self.out, op, false, (left, right), span, Type::Bool);
            return Ok(self.finish_op(node));
        }

        let ty = self.operand_type(op, (left, right), span, expected)?;
        let result_ty = if op.is_comparison() { Type::Bool } else { ty };

        match ty {
            Type::Numeric(numeric) => {
                // Integer `/` divides to an integer, rounding down.
                let op = if op == BinaryOp::Div && numeric.is_integer() {
                    BinaryOp::FloorDiv
                } else {
                    op
                };
                if op == BinaryOp::Pow
                    && numeric.is_integer()
                    && coerce::is_invalid_int_exponent(self.src, right)
                {
                    return Err(LowerError::new(
                        LowerErrorKind::InvalidExponent { base: numeric },
                        self.src.span(right),
                    ));
                }
                let left = self.lower_to(left, ty)?;
                // Left-biased: a differently typed right operand gets the
                // conversion.
                let right = self.lower_to(right, ty)?;

                if op == BinaryOp::FloorDiv && numeric.is_float() {
                    let quotient =
                        O::binary(&mut self.out, BinaryOp::Div, false, (left, right), span, ty);
                    let quotient = self.finish_op(quotient);
                    let floor = self.out.alloc_typed(ExprKind::FloorOf(quotient), span, ty);
                    return Ok(self.finish_op(floor));
                }
                let node = O::binary(&mut self.out, op, false, (left, right), span, result_ty);
                Ok(self.finish_op(node))
            }
            Type::Str if op == BinaryOp::Add || op.is_comparison() => {
                let left = self.lower_to(left, ty)?;
                let right = self.lower_to(right, ty)?;
                let node = O::binary(&mut self.out, op, true, (left, right), span, result_ty);
                Ok(self.finish_op(node))
            }
            _ if matches!(op, BinaryOp::Eq | BinaryOp::NotEq) => {
                let left = self.lower_to(left, ty)?;
                let right = self.lower_to(right, ty)?;
                let node = O::binary(&mut self.out, op, false, (left, right), span, result_ty);
                Ok(self.finish_op(node))
            }
            _ => Err(LowerError::new(
                LowerErrorKind::TypeMismatch {
                    expected: "a number".to_string(),
                    found: self.type_name(ty),
                },
                span,
            )),
        }
    }

    /// The type both operands of `op` are brought to.
    ///
    /// A typed left operand decides without looking right.
    fn operand_type(
        &mut self,
        op: BinaryOp,
        (left, right): (ExprId, ExprId),
        span: Span,
        expected: Option<Type>,
    ) -> Result<Type, LowerError> {
        let left = self.infer(left)?;
        if let Inferred::Known(ty) = left {
            return Ok(ty);
        }
        let right = self.infer(right)?;
        let context = if op.is_arithmetic() { expected } else { None };
        coerce::operand_type(left, right, context)
            .ok_or_else(|| LowerError::new(LowerErrorKind::AmbiguousLiteral, span))
    }
}
