use super::*;
use pretty_assertions::assert_eq;
use sable_ir::{CompilationUnit, NumericType, Span};

fn table_of(unit: CompilationUnit, interner: &StringInterner) -> SymbolTable {
    let mut table = SymbolTable::new();
    for decl in unit.decls {
        table.define(decl, interner).unwrap();
    }
    table
}

#[test]
fn same_named_declarations_get_distinct_ids() {
    let interner = StringInterner::new();
    let talk = interner.intern("talk");
    let mut unit = CompilationUnit::new();
    let body = unit.unit();
    let a = unit.add_function(talk, &[], Type::Unit, body);
    let b = unit.add_function(talk, &[], Type::Unit, body);

    let table = table_of(unit, &interner);
    assert_eq!(table.named(talk), &[a, b]);
    assert_eq!(table.len(), 2);
}

#[test]
fn duplicate_field_is_rejected_at_definition() {
    let interner = StringInterner::new();
    let animal = interner.intern("Animal");
    let name = interner.intern("name");
    let mut unit = CompilationUnit::new();
    unit.add_record(animal, &[(name, Type::Str), (name, Type::Str)]);

    let mut table = SymbolTable::new();
    let err = table
        .define(unit.decls.remove(0), &interner)
        .unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::DuplicateFieldName {
            record: "Animal".into(),
            field: "name".into()
        }
    );
    assert_eq!(err.origin, Some(DeclId::new(0)));
    assert!(table.is_empty());
}

#[test]
fn single_callable_resolves_without_matching() {
    let interner = StringInterner::new();
    let square = interner.intern("square");
    let x = interner.intern("x");
    let mut unit = CompilationUnit::new();
    let body = unit.local(x);
    let id = unit.add_function(square, &[(x, Type::Numeric(NumericType::I32))], Type::Numeric(NumericType::I32), body);

    let table = table_of(unit, &interner);
    assert_eq!(table.resolve(square, &[Inferred::Known(Type::Str)]), Lookup::Found(id));
    assert_eq!(table.resolve(interner.intern("cube"), &[]), Lookup::NotFound);
}

#[test]
fn overloads_are_filtered_by_argument_shape() {
    let interner = StringInterner::new();
    let show = interner.intern("show");
    let x = interner.intern("x");
    let f32_ty = Type::Numeric(NumericType::F32);
    let i32_ty = Type::Numeric(NumericType::I32);
    let mut unit = CompilationUnit::new();
    let body = unit.unit();
    let on_float = unit.add_function(show, &[(x, f32_ty)], Type::Unit, body);
    let on_int = unit.add_function(show, &[(x, i32_ty)], Type::Unit, body);
    let on_str = unit.add_function(show, &[(x, Type::Str)], Type::Unit, body);

    let table = table_of(unit, &interner);
    assert_eq!(table.resolve(show, &[Inferred::Known(f32_ty)]), Lookup::Found(on_float));
    assert_eq!(table.resolve(show, &[Inferred::Known(i32_ty)]), Lookup::Found(on_int));
    assert_eq!(table.resolve(show, &[Inferred::Known(Type::Str)]), Lookup::Found(on_str));
    assert_eq!(table.resolve(show, &[Inferred::FloatLiteral]), Lookup::Found(on_float));
    assert_eq!(
        table.resolve(show, &[Inferred::IntLiteral]),
        Lookup::Ambiguous { candidates: 2 }
    );
    assert_eq!(
        table.resolve(show, &[Inferred::Known(Type::Bool)]),
        Lookup::NoMatch { candidates: 3 }
    );
}

#[test]
fn constants_are_told_apart_by_wanted_type() {
    let interner = StringInterner::new();
    let pi = interner.intern("pi_ish");
    let f32_ty = Type::Numeric(NumericType::F32);
    let i32_ty = Type::Numeric(NumericType::I32);
    let mut unit = CompilationUnit::new();
    let a = unit.float(3.14);
    let b = unit.int(3);
    let as_float = unit.add_constant(pi, Some(f32_ty), a);
    let as_int = unit.add_constant(pi, Some(i32_ty), b);

    let table = table_of(unit, &interner);
    let type_of = |id: DeclId| match table.decl(id).kind {
        DeclKind::Constant { ty: Some(ty), .. } => Ok(ty),
        _ => Err(LowerError::new(LowerErrorKind::AmbiguousLiteral, Span::DUMMY)),
    };

    assert_eq!(table.resolve_constant(pi, Some(f32_ty), type_of), Ok(Lookup::Found(as_float)));
    assert_eq!(table.resolve_constant(pi, Some(i32_ty), type_of), Ok(Lookup::Found(as_int)));
    assert_eq!(
        table.resolve_constant(pi, None, type_of),
        Ok(Lookup::Ambiguous { candidates: 2 })
    );
    assert_eq!(
        table.resolve_constant(interner.intern("tau"), None, type_of),
        Ok(Lookup::NotFound)
    );
}

#[test]
fn record_lookup_requires_a_unique_record() {
    let interner = StringInterner::new();
    let dog = interner.intern("Dog");
    let mut unit = CompilationUnit::new();
    let id = unit.add_record(dog, &[]);

    let table = table_of(unit, &interner);
    assert_eq!(table.record(dog), Some(id));
    assert_eq!(table.record(interner.intern("Cat")), None);
}
