//! Calls, numeric constructors and record construction.

use rustc_hash::FxHashSet;

use sable_ir::{
    DeclId, ExprId, ExprKind, ExprRange, FieldInit, FieldInitRange, Name, NumericType, Span, Type,
};

use super::Lowerer;
use crate::coerce::{self, bind_literal, literal_description, Inferred};
use crate::operators::OperatorLowering;
use crate::symbols::Lookup;
use crate::{LowerError, LowerErrorKind};

/// What a call by name turned out to call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Callee {
    Decl(DeclId),
    /// `float32(x)` written as an ordinary call.
    Convert(NumericType),
}

impl<O: OperatorLowering> Lowerer<'_, O> {
    pub(super) fn lower_call(
        &mut self,
        callee: Name,
        args: ExprRange,
        span: Span,
    ) -> Result<ExprId, LowerError> {
        let args = self.src.get_expr_list(args);
        match self.resolve_call(callee, args, span)? {
            Callee::Decl(target) => self.lower_call_decl(target, args, span),
            Callee::Convert(to) => self.lower_convert(to, args[0], span),
        }
    }

    /// Pick the declaration `callee(args..)` calls.
    ///
    /// A call whose first argument is a record and whose name is a
    /// capability dispatches on the record type. Anything else is an
    /// ordinary, possibly overloaded, function call.
    pub(super) fn resolve_call(
        &mut self,
        callee: Name,
        args: &[ExprId],
        span: Span,
    ) -> Result<Callee, LowerError> {
        let capabilities = self.capabilities;
        if let Some(&receiver) = args.first() {
            if capabilities.is_capability(callee) {
                if let Some(record) = self.infer(receiver)?.known().and_then(Type::as_record) {
                    return self.dispatch(callee, record, &args[1..], span).map(Callee::Decl);
                }
            }
        }

        let symbols = self.symbols;
        let candidates = symbols.callables(callee);
        if candidates.is_empty() {
            if let (Some(to), 1) = (NumericType::from_name(self.interner.lookup(callee)), args.len()) {
                return Ok(Callee::Convert(to));
            }
            return Err(LowerError::new(
                LowerErrorKind::UnknownFunction {
                    name: self.name(callee),
                },
                span,
            ));
        }
        // A lone candidate is checked by lowering its arguments.
        if let [only] = candidates.as_slice() {
            return Ok(Callee::Decl(*only));
        }

        let shapes = self.infer_all(args)?;
        match symbols.resolve(callee, &shapes) {
            Lookup::Found(target) => Ok(Callee::Decl(target)),
            Lookup::NotFound | Lookup::NoMatch { .. } => Err(LowerError::new(
                LowerErrorKind::TypeMismatch {
                    expected: format!("arguments accepted by one of the `{}` overloads", self.name(callee)),
                    found: self.describe_shapes(&shapes),
                },
                span,
            )),
            Lookup::Ambiguous { candidates } => Err(LowerError::new(
                LowerErrorKind::AmbiguousOverload {
                    name: self.name(callee),
                    candidates,
                },
                span,
            )),
        }
    }

    fn dispatch(
        &mut self,
        capability: Name,
        record: DeclId,
        rest: &[ExprId],
        span: Span,
    ) -> Result<DeclId, LowerError> {
        let capabilities = self.capabilities;
        // Only several implementations need the remaining arguments.
        let rest = if capabilities.implementations(capability, record).len() > 1 {
            self.infer_all(rest)?
        } else {
            Vec::new()
        };
        match capabilities.resolve(self.symbols, capability, record, &rest) {
            Lookup::Found(target) => {
                tracing::debug!(
                    capability = self.interner.lookup(capability),
                    receiver = self.interner.lookup(self.symbols.decl(record).name),
                    target = target.raw(),
                    "resolved capability"
                );
                Ok(target)
            }
            Lookup::NotFound => Err(LowerError::new(
                LowerErrorKind::UnresolvedCapability {
                    capability: self.name(capability),
                    receiver: self.type_name(Type::Record(record)),
                },
                span,
            )),
            Lookup::NoMatch { candidates } | Lookup::Ambiguous { candidates } => {
                Err(LowerError::new(
                    LowerErrorKind::AmbiguousCapability {
                        capability: self.name(capability),
                        receiver: self.type_name(Type::Record(record)),
                        candidates,
                    },
                    span,
                ))
            }
        }
    }

    fn infer_all(&mut self, args: &[ExprId]) -> Result<Vec<Inferred>, LowerError> {
        args.iter().map(|&arg| self.infer(arg)).collect()
    }

    fn describe_shapes(&self, shapes: &[Inferred]) -> String {
        let parts: Vec<String> = shapes
            .iter()
            .map(|shape| match shape {
                Inferred::Known(ty) => self.type_name(*ty),
                Inferred::IntLiteral => "integer literal".to_string(),
                Inferred::FloatLiteral => "float literal".to_string(),
            })
            .collect();
        format!("({})", parts.join(", "))
    }

    /// Lower a call to a resolved declaration, coercing each argument to
    /// its parameter type.
    pub(super) fn lower_call_decl(
        &mut self,
        target: DeclId,
        args: &[ExprId],
        span: Span,
    ) -> Result<ExprId, LowerError> {
        let symbols = self.symbols;
        let decl = symbols.decl(target);
        let (Some(params), Some(ret)) = (decl.params(), decl.ret()) else {
            return Err(LowerError::new(
                LowerErrorKind::UnknownFunction {
                    name: self.name(decl.name),
                },
                span,
            ));
        };
        if params.len() != args.len() {
            return Err(LowerError::new(
                LowerErrorKind::ArgCountMismatch {
                    name: self.name(decl.name),
                    expected: params.len(),
                    found: args.len(),
                },
                span,
            ));
        }

        let lowered = params
            .iter()
            .zip(args)
            .map(|(param, &arg)| self.lower_to(arg, param.ty))
            .collect::<Result<Vec<_>, _>>()?;
        let args = self.out.push_expr_list(&lowered);
        Ok(self
            .out
            .alloc_typed(ExprKind::CallDecl { target, args }, span, ret))
    }

    pub(super) fn return_type(&self, target: DeclId, span: Span) -> Result<Type, LowerError> {
        let decl = self.symbols.decl(target);
        decl.ret().ok_or_else(|| {
            LowerError::new(
                LowerErrorKind::UnknownFunction {
                    name: self.name(decl.name),
                },
                span,
            )
        })
    }

    /// Lower a numeric constructor.
    ///
    /// An untyped numeric literal binds straight to `to`. Text and truth
    /// values are never numbers, so `int32("2;")` is rejected rather than
    /// passed through.
    pub(super) fn lower_convert(
        &mut self,
        to: NumericType,
        value: ExprId,
        span: Span,
    ) -> Result<ExprId, LowerError> {
        let kind = *self.src.kind(value);
        let value_span = self.src.span(value);
        match kind {
            ExprKind::Int(_) | ExprKind::Float(_) if self.src.ty(value).is_none() => {
                let bound = bind_literal(kind, to).map_err(|kind| LowerError::new(kind, value_span))?;
                return Ok(self.out.alloc_typed(bound, value_span, Type::Numeric(to)));
            }
            ExprKind::Str(_) | ExprKind::Bool(_) | ExprKind::Unit => {
                return Err(LowerError::new(
                    LowerErrorKind::TypeMismatchLiteral {
                        literal: literal_description(&kind),
                        expected: to.name().to_string(),
                    },
                    value_span,
                ));
            }
            _ => {}
        }

        let lowered = self.lower_expr(value, Some(Type::Numeric(to)))?;
        match self.out_ty(lowered) {
            Type::Numeric(from) => Ok(coerce::convert(&mut self.out, lowered, (from, to), span)),
            found => Err(LowerError::new(
                LowerErrorKind::TypeMismatch {
                    expected: "a number".to_string(),
                    found: self.type_name(found),
                },
                value_span,
            )),
        }
    }

    /// Lower a record construction. Every field is initialized exactly once
    /// and initializers are emitted in declaration order.
    pub(super) fn lower_construct(
        &mut self,
        record: DeclId,
        inits: FieldInitRange,
        span: Span,
    ) -> Result<ExprId, LowerError> {
        let symbols = self.symbols;
        let decl = symbols.decl(record);
        let Some(fields) = decl.fields() else {
            return Err(LowerError::new(
                LowerErrorKind::TypeMismatch {
                    expected: "a record".to_string(),
                    found: format!("{} `{}`", decl.describe(), self.name(decl.name)),
                },
                span,
            ));
        };
        let inits = self.src.get_field_inits(inits);

        let mut seen = FxHashSet::default();
        for init in inits {
            if !fields.iter().any(|field| field.name == init.name) {
                return Err(LowerError::new(
                    LowerErrorKind::UnknownField {
                        ty: self.name(decl.name),
                        field: self.name(init.name),
                    },
                    self.src.span(init.value),
                ));
            }
            if !seen.insert(init.name) {
                return Err(LowerError::new(
                    LowerErrorKind::DuplicateFieldName {
                        record: self.name(decl.name),
                        field: self.name(init.name),
                    },
                    self.src.span(init.value),
                ));
            }
        }

        let mut lowered = Vec::with_capacity(fields.len());
        for field in fields {
            let Some(init) = inits.iter().find(|init| init.name == field.name) else {
                return Err(LowerError::new(
                    LowerErrorKind::MissingField {
                        record: self.name(decl.name),
                        field: self.name(field.name),
                    },
                    span,
                ));
            };
            lowered.push(FieldInit {
                name: field.name,
                value: self.lower_to(init.value, field.ty)?,
            });
        }
        let fields = self.out.push_field_inits(&lowered);
        Ok(self.out.alloc_typed(
            ExprKind::Construct { record, fields },
            span,
            Type::Record(record),
        ))
    }
}
