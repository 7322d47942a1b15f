//! Declaration and expression lowering.
//!
//! Walks every declaration of a unit and rebuilds its expressions into a
//! fresh arena, resolving as it goes:
//! - `Call` by name becomes `CallDecl` against one declaration, through the
//!   capability index when the receiver is a record
//! - `Global` becomes `ConstRef`
//! - untyped literals are bound to the type their context demands, and
//!   mixed numeric operands meet through explicit conversions
//! - operators are emitted by the run's [`OperatorLowering`] strategy
//!
//! Every node in the output arena carries its type. The output is valid
//! input, which is what lets the pipeline be re-run on its own result.

mod calls;
mod expr;
mod infer;

use std::marker::PhantomData;

use rustc_hash::{FxHashMap, FxHashSet};

use sable_ir::{
    DeclId, DeclKind, Declaration, ExprArena, ExprId, Name, Span, StringInterner, Type,
};

use crate::coerce::{self, Inferred};
use crate::dispatch::CapabilityIndex;
use crate::operators::OperatorLowering;
use crate::stack::ensure_sufficient_stack;
use crate::symbols::SymbolTable;
use crate::{fold, LowerConfig, LowerError, LowerErrorKind};

/// Lowering state for one unit.
pub(crate) struct Lowerer<'a, O: OperatorLowering> {
    src: &'a ExprArena,
    symbols: &'a SymbolTable,
    capabilities: &'a CapabilityIndex,
    interner: &'a StringInterner,
    config: &'a LowerConfig,

    out: ExprArena,

    /// Innermost scope last. Function parameters form the outermost scope.
    scopes: Vec<FxHashMap<Name, Type>>,
    /// Inference results for the declaration being lowered.
    inferred: FxHashMap<ExprId, Inferred>,
    constant_types: FxHashMap<DeclId, Type>,
    /// Constants whose type is being inferred right now.
    inferring: FxHashSet<DeclId>,

    _strategy: PhantomData<O>,
}

impl<'a, O: OperatorLowering> Lowerer<'a, O> {
    pub(crate) fn new(
        src: &'a ExprArena,
        symbols: &'a SymbolTable,
        capabilities: &'a CapabilityIndex,
        interner: &'a StringInterner,
        config: &'a LowerConfig,
    ) -> Self {
        Lowerer {
            src,
            symbols,
            capabilities,
            interner,
            config,
            out: ExprArena::new(),
            scopes: Vec::new(),
            inferred: FxHashMap::default(),
            constant_types: FxHashMap::default(),
            inferring: FxHashSet::default(),
            _strategy: PhantomData,
        }
    }

    /// Lower every declaration, returning the new arena and the lowered
    /// declarations in their original order.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(decls = self.symbols.len(), style = ?O::STYLE)
    )]
    pub(crate) fn lower_decls(mut self) -> Result<(ExprArena, Vec<Declaration>), LowerError> {
        let symbols = self.symbols;
        let mut decls = Vec::with_capacity(symbols.len());
        for (id, decl) in symbols.iter() {
            let lowered = self.lower_decl(id, decl).map_err(|err| err.in_decl(id))?;
            decls.push(lowered);
        }
        Ok((self.out, decls))
    }

    fn lower_decl(&mut self, id: DeclId, decl: &Declaration) -> Result<Declaration, LowerError> {
        self.inferred.clear();
        let kind = match &decl.kind {
            DeclKind::Function { params, ret, body } => {
                let scope = params.iter().map(|p| (p.name, p.ty)).collect();
                self.scopes = vec![scope];
                let body = self.lower_to(*body, *ret)?;
                self.scopes.clear();
                DeclKind::Function {
                    params: params.clone(),
                    ret: *ret,
                    body,
                }
            }
            DeclKind::Constant { value, .. } => {
                let ty = self.constant_type(id)?;
                self.scopes = vec![FxHashMap::default()];
                let value = self.lower_to(*value, ty)?;
                self.scopes.clear();
                DeclKind::Constant {
                    ty: Some(ty),
                    value,
                }
            }
            DeclKind::Extern { .. } | DeclKind::Record { .. } => decl.kind.clone(),
        };
        Ok(Declaration {
            name: decl.name,
            kind,
            span: decl.span,
        })
    }

    // Expressions

    /// Lower `id` with `expected` as the binding context for literals.
    ///
    /// The result may still have a different type than `expected`; use
    /// [`Self::lower_to`] where the type is required.
    fn lower_expr(&mut self, id: ExprId, expected: Option<Type>) -> Result<ExprId, LowerError> {
        ensure_sufficient_stack(|| self.lower_expr_inner(id, expected))
    }

    /// Lower `id` and bring it to `ty`.
    fn lower_to(&mut self, id: ExprId, ty: Type) -> Result<ExprId, LowerError> {
        let lowered = self.lower_expr(id, Some(ty))?;
        self.coerce_to(lowered, ty)
    }

    /// Bring a lowered value to `ty`, converting between numeric types.
    ///
    /// A text, boolean or unit literal where a number is required is a
    /// literal mismatch rather than a plain type mismatch.
    fn coerce_to(&mut self, id: ExprId, ty: Type) -> Result<ExprId, LowerError> {
        let found = self.out_ty(id);
        if found == ty {
            return Ok(id);
        }
        match (found, ty) {
            (Type::Numeric(from), Type::Numeric(to)) => {
                let span = self.out.span(id);
                Ok(coerce::convert(&mut self.out, id, (from, to), span))
            }
            (_, Type::Numeric(to)) if self.out.kind(id).is_literal() => Err(LowerError::new(
                LowerErrorKind::TypeMismatchLiteral {
                    literal: coerce::literal_description(self.out.kind(id)),
                    expected: to.name().to_string(),
                },
                self.out.span(id),
            )),
            _ => Err(self.mismatch(ty, found, self.out.span(id))),
        }
    }

    /// Fold a freshly emitted operator node when folding is on.
    fn finish_op(&mut self, id: ExprId) -> ExprId {
        if self.config.fold_constants {
            if let Some(kind) = fold::try_fold(&self.out, id) {
                self.out.set_kind(id, kind);
            }
        }
        id
    }

    /// Type of a lowered node. Lowering types every node it emits.
    fn out_ty(&self, id: ExprId) -> Type {
        self.out.ty(id).unwrap_or(Type::Unit)
    }

    // Scopes

    fn lookup_local(&self, name: Name) -> Option<Type> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }

    fn bind_local(&mut self, name: Name, ty: Type) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, ty);
        }
    }

    fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push(FxHashMap::default());
        let result = f(self);
        self.scopes.pop();
        result
    }

    // Constants

    /// Type of constant `id`: its declared type, or the type of its value.
    fn constant_type(&mut self, id: DeclId) -> Result<Type, LowerError> {
        if let Some(&ty) = self.constant_types.get(&id) {
            return Ok(ty);
        }
        let symbols = self.symbols;
        let decl = symbols.decl(id);
        let DeclKind::Constant { ty, value } = decl.kind else {
            return Err(LowerError::new(
                LowerErrorKind::UnknownConstant {
                    name: self.name(decl.name),
                },
                decl.span,
            ));
        };
        let ty = match ty {
            Some(ty) => ty,
            None => {
                if !self.inferring.insert(id) {
                    return Err(LowerError::new(
                        LowerErrorKind::CyclicConstant {
                            name: self.name(decl.name),
                        },
                        decl.span,
                    )
                    .in_decl(id));
                }
                // Constant values see no locals.
                let scopes = std::mem::replace(&mut self.scopes, vec![FxHashMap::default()]);
                let inferred = self.infer(value).map_err(|err| err.in_decl(id));
                self.scopes = scopes;
                self.inferring.remove(&id);
                inferred?.known().ok_or_else(|| {
                    LowerError::new(LowerErrorKind::AmbiguousLiteral, self.src.span(value))
                        .in_decl(id)
                })?
            }
        };
        self.constant_types.insert(id, ty);
        Ok(ty)
    }

    // Messages

    fn name(&self, name: Name) -> String {
        self.interner.lookup(name).to_string()
    }

    fn type_name(&self, ty: Type) -> String {
        match ty {
            Type::Numeric(n) => n.name().to_string(),
            Type::Bool => "bool".to_string(),
            Type::Str => "str".to_string(),
            Type::Unit => "unit".to_string(),
            Type::Record(id) => self.name(self.symbols.decl(id).name),
        }
    }

    fn mismatch(&self, expected: Type, found: Type, span: Span) -> LowerError {
        LowerError::new(
            LowerErrorKind::TypeMismatch {
                expected: self.type_name(expected),
                found: self.type_name(found),
            },
            span,
        )
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
