//! Text dump of lowered declarations.
//!
//! Debugging and test aid only; not a backend. The output reads like the
//! target: `True`/`None` literals, `math.floor`, `op.add(a, b)`, and
//! declarations referred to by their emitted names.

use sable_ir::{
    DeclKind, Declaration, ExprArena, ExprId, ExprKind, Name, Param, StringInterner, Type,
    UnaryOp,
};

use crate::stack::ensure_sufficient_stack;

/// Render the expression tree rooted at `id`.
///
/// `decl_names` maps each `DeclId` index to the name it is printed under.
pub fn render_expr(
    arena: &ExprArena,
    id: ExprId,
    decl_names: &[Name],
    interner: &StringInterner,
) -> String {
    let mut renderer = Renderer::new(arena, decl_names, interner);
    renderer.expr(id);
    renderer.out
}

/// Render one declaration under `name`.
pub fn render_decl(
    arena: &ExprArena,
    decl: &Declaration,
    name: Name,
    decl_names: &[Name],
    interner: &StringInterner,
) -> String {
    let mut renderer = Renderer::new(arena, decl_names, interner);
    let name = interner.lookup(name);
    match &decl.kind {
        DeclKind::Function { params, ret, body } => {
            renderer.signature("def ", name, params, *ret);
            renderer.emit(": ");
            renderer.expr(*body);
        }
        DeclKind::Extern { params, ret } => renderer.signature("extern def ", name, params, *ret),
        DeclKind::Record { fields } => {
            renderer.emit("record ");
            renderer.emit(name);
            renderer.emit("(");
            for (i, field) in fields.iter().enumerate() {
                renderer.separator(i);
                renderer.typed(field.name, field.ty);
            }
            renderer.emit(")");
        }
        DeclKind::Constant { ty, value } => renderer.binding(name, *ty, *value),
    }
    renderer.out
}

struct Renderer<'a> {
    arena: &'a ExprArena,
    decl_names: &'a [Name],
    interner: &'a StringInterner,
    out: String,
}

impl<'a> Renderer<'a> {
    fn new(arena: &'a ExprArena, decl_names: &'a [Name], interner: &'a StringInterner) -> Self {
        Renderer {
            arena,
            decl_names,
            interner,
            out: String::new(),
        }
    }

    fn emit(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn separator(&mut self, index: usize) {
        if index > 0 {
            self.emit(", ");
        }
    }

    fn decl_name(&self, index: usize) -> &'static str {
        self.decl_names
            .get(index)
            .map_or("<unknown>", |&name| self.interner.lookup(name))
    }

    fn type_name(&self, ty: Type) -> &'static str {
        match ty {
            Type::Numeric(n) => n.name(),
            Type::Bool => "bool",
            Type::Str => "str",
            Type::Unit => "None",
            Type::Record(id) => self.decl_name(id.index()),
        }
    }

    fn typed(&mut self, name: Name, ty: Type) {
        self.emit(self.interner.lookup(name));
        self.emit(": ");
        self.emit(self.type_name(ty));
    }

    fn signature(&mut self, keyword: &str, name: &str, params: &[Param], ret: Type) {
        self.emit(keyword);
        self.emit(name);
        self.emit("(");
        for (i, param) in params.iter().enumerate() {
            self.separator(i);
            self.typed(param.name, param.ty);
        }
        self.emit(") -> ");
        self.emit(self.type_name(ret));
    }

    fn binding(&mut self, name: &str, ty: Option<Type>, value: ExprId) {
        self.emit(name);
        if let Some(ty) = ty {
            self.emit(": ");
            self.emit(self.type_name(ty));
        }
        self.emit(" = ");
        self.expr(value);
    }

    fn list(&mut self, ids: &[ExprId]) {
        for (i, &id) in ids.iter().enumerate() {
            self.separator(i);
            self.expr(id);
        }
    }

    fn call(&mut self, callee: &str, args: &[ExprId]) {
        self.emit(callee);
        self.emit("(");
        self.list(args);
        self.emit(")");
    }

    fn expr(&mut self, id: ExprId) {
        ensure_sufficient_stack(|| self.expr_inner(id));
    }

    fn expr_inner(&mut self, id: ExprId) {
        let arena = self.arena;
        match *arena.kind(id) {
            ExprKind::Int(value) => self.emit(&value.to_string()),
            ExprKind::Float(bits) => self.emit(&format!("{:?}", f64::from_bits(bits))),
            ExprKind::Bool(true) => self.emit("True"),
            ExprKind::Bool(false) => self.emit("False"),
            ExprKind::Str(text) => self.emit(&format!("{:?}", self.interner.lookup(text))),
            ExprKind::Unit => self.emit("None"),

            ExprKind::Local(name) | ExprKind::Global(name) => self.emit(self.interner.lookup(name)),
            ExprKind::ConstRef(target) => self.emit(self.decl_name(target.index())),
            ExprKind::Field { receiver, field } => {
                self.expr(receiver);
                self.emit(".");
                self.emit(self.interner.lookup(field));
            }

            ExprKind::Unary { op, operand } => {
                self.emit(match op {
                    UnaryOp::Neg => "(-",
                    UnaryOp::Not => "(not ",
                });
                self.expr(operand);
                self.emit(")");
            }
            ExprKind::Binary { op, left, right } => {
                self.emit("(");
                self.expr(left);
                self.emit(" ");
                self.emit(op.as_symbol());
                self.emit(" ");
                self.expr(right);
                self.emit(")");
            }
            ExprKind::OpCall { op, args } => {
                self.call(&format!("op.{}", op.name()), arena.get_expr_list(args));
            }
            ExprKind::FloorOf(value) => self.call("math.floor", &[value]),

            ExprKind::Call { callee, args } => {
                self.call(self.interner.lookup(callee), arena.get_expr_list(args));
            }
            ExprKind::CallDecl { target, args } => {
                self.call(self.decl_name(target.index()), arena.get_expr_list(args));
            }
            ExprKind::Convert { to, value } => self.call(to.name(), &[value]),
            ExprKind::Construct { record, fields } => {
                self.emit(self.decl_name(record.index()));
                self.emit("(");
                for (i, init) in arena.get_field_inits(fields).iter().enumerate() {
                    self.separator(i);
                    self.emit(self.interner.lookup(init.name));
                    self.emit("=");
                    self.expr(init.value);
                }
                self.emit(")");
            }

            ExprKind::Let { name, ty, value } => {
                self.binding(self.interner.lookup(name), ty, value);
            }
            ExprKind::Block { exprs } => {
                self.emit("{ ");
                for (i, &expr) in arena.get_expr_list(exprs).iter().enumerate() {
                    if i > 0 {
                        self.emit("; ");
                    }
                    self.expr(expr);
                }
                self.emit(" }");
            }
        }
    }
}
