//! Compilation units and construction helpers.

use crate::{
    BinaryOp, DeclId, DeclKind, Declaration, ExprArena, ExprId, ExprKind, Field, FieldInit, Name,
    NamedOp, NumericType, Param, Span, Type, UnaryOp,
};

/// One compilation unit: its declarations in source order plus the arena
/// holding every expression they reference.
///
/// The helper constructors allocate nodes with [`Span::DUMMY`]; front-ends
/// that track locations allocate through [`ExprArena`] directly.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompilationUnit {
    pub arena: ExprArena,
    pub decls: Vec<Declaration>,
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration, returning its origin identity.
    pub fn push_decl(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId::from_index(self.decls.len());
        self.decls.push(decl);
        id
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    /// Iterate over declarations with their IDs.
    pub fn iter_decls(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, decl)| (DeclId::from_index(i), decl))
    }

    // Declarations

    pub fn add_function(&mut self, name: Name, params: &[(Name, Type)], ret: Type, body: ExprId) -> DeclId {
        let params = params.iter().map(|&(name, ty)| Param { name, ty }).collect();
        self.push_decl(Declaration {
            name,
            kind: DeclKind::Function { params, ret, body },
            span: Span::DUMMY,
        })
    }

    pub fn add_extern(&mut self, name: Name, params: &[(Name, Type)], ret: Type) -> DeclId {
        let params = params.iter().map(|&(name, ty)| Param { name, ty }).collect();
        self.push_decl(Declaration {
            name,
            kind: DeclKind::Extern { params, ret },
            span: Span::DUMMY,
        })
    }

    pub fn add_record(&mut self, name: Name, fields: &[(Name, Type)]) -> DeclId {
        let fields = fields.iter().map(|&(name, ty)| Field { name, ty }).collect();
        self.push_decl(Declaration {
            name,
            kind: DeclKind::Record { fields },
            span: Span::DUMMY,
        })
    }

    pub fn add_constant(&mut self, name: Name, ty: Option<Type>, value: ExprId) -> DeclId {
        self.push_decl(Declaration {
            name,
            kind: DeclKind::Constant { ty, value },
            span: Span::DUMMY,
        })
    }

    // Expressions

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.arena.alloc(kind, Span::DUMMY)
    }

    /// Attach a front-end type annotation to an expression.
    pub fn annotate(&mut self, id: ExprId, ty: Type) -> ExprId {
        self.arena.set_ty(id, ty);
        id
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Int(value))
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.expr(ExprKind::Float(value.to_bits()))
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Bool(value))
    }

    pub fn str(&mut self, value: Name) -> ExprId {
        self.expr(ExprKind::Str(value))
    }

    pub fn unit(&mut self) -> ExprId {
        self.expr(ExprKind::Unit)
    }

    pub fn local(&mut self, name: Name) -> ExprId {
        self.expr(ExprKind::Local(name))
    }

    pub fn global(&mut self, name: Name) -> ExprId {
        self.expr(ExprKind::Global(name))
    }

    pub fn field(&mut self, receiver: ExprId, field: Name) -> ExprId {
        self.expr(ExprKind::Field { receiver, field })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub fn op_call(&mut self, op: NamedOp, args: &[ExprId]) -> ExprId {
        let args = self.arena.push_expr_list(args);
        self.expr(ExprKind::OpCall { op, args })
    }

    pub fn floor_of(&mut self, value: ExprId) -> ExprId {
        self.expr(ExprKind::FloorOf(value))
    }

    pub fn call(&mut self, callee: Name, args: &[ExprId]) -> ExprId {
        let args = self.arena.push_expr_list(args);
        self.expr(ExprKind::Call { callee, args })
    }

    pub fn call_decl(&mut self, target: DeclId, args: &[ExprId]) -> ExprId {
        let args = self.arena.push_expr_list(args);
        self.expr(ExprKind::CallDecl { target, args })
    }

    pub fn convert(&mut self, to: NumericType, value: ExprId) -> ExprId {
        self.expr(ExprKind::Convert { to, value })
    }

    pub fn construct(&mut self, record: DeclId, fields: &[(Name, ExprId)]) -> ExprId {
        let inits: Vec<FieldInit> = fields
            .iter()
            .map(|&(name, value)| FieldInit { name, value })
            .collect();
        let fields = self.arena.push_field_inits(&inits);
        self.expr(ExprKind::Construct { record, fields })
    }

    pub fn let_(&mut self, name: Name, ty: Option<Type>, value: ExprId) -> ExprId {
        self.expr(ExprKind::Let { name, ty, value })
    }

    pub fn block(&mut self, exprs: &[ExprId]) -> ExprId {
        let exprs = self.arena.push_expr_list(exprs);
        self.expr(ExprKind::Block { exprs })
    }
}
