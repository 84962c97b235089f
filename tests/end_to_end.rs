//! End-to-end scenarios exercising the public pipeline (lex -> parse ->
//! lower -> build scope) directly, without shelling out to the binary.

use langfront::ast::{Decl, ExprKind, LiteralKind, Op, Stmt, TypeExpr};
use langfront::error::CompileError;
use langfront::scope::Scope;
use langfront::types::Type;
use langfront::{compile, Program};

fn parse(src: &str) -> Program {
    compile(src).expect("expected source to compile cleanly")
}

#[test]
fn scalar_variable_declaration_with_int_initializer() {
    let program = parse("x: i32 = 10;");
    assert_eq!(program.decls.len(), 1);
    let Decl::Variable(v) = &program.decls[0] else {
        panic!("expected a variable declaration")
    };
    assert_eq!(v.name, "x");
    assert!(matches!(
        &v.type_expr,
        TypeExpr::Regular { base_name, pre_stars: 0, post_stars: 0, sizes, .. }
            if base_name == "i32" && sizes.is_empty()
    ));
    let init = v.initializer.as_ref().expect("expected an initializer");
    assert!(matches!(
        &init.kind,
        ExprKind::Literal(lit) if lit.kind == LiteralKind::Int && lit.text == "10"
    ));
}

#[test]
fn array_variable_declaration_with_initializer_list() {
    let program = parse("arr: i32[5] = { 1, 2, 3, 4, 5 };");
    let Decl::Variable(v) = &program.decls[0] else {
        panic!("expected a variable declaration")
    };
    let TypeExpr::Regular { base_name, sizes, .. } = &v.type_expr else {
        panic!("expected a regular type expression")
    };
    assert_eq!(base_name, "i32");
    assert_eq!(sizes.len(), 1);

    let scope = Scope::from_program(&program).unwrap();
    let symbol = scope.variables.get("arr").expect("arr should be bound");
    assert!(matches!(
        &symbol.ty,
        Type::Array { size: 5, .. }
    ));

    let init = v.initializer.as_ref().unwrap();
    let ExprKind::InitializerList(items) = &init.kind else {
        panic!("expected an initializer list")
    };
    assert_eq!(items.len(), 5);
    for (i, item) in items.iter().enumerate() {
        assert!(matches!(
            &item.kind,
            ExprKind::Literal(lit) if lit.text == (i + 1).to_string()
        ));
    }
}

#[test]
fn trailing_comma_in_initializer_list_is_a_parse_error() {
    let err = compile("arr: i32[5] = { 1, 2, 3, };").unwrap_err();
    let CompileError::Parse(diag) = err else {
        panic!("expected a parse error")
    };
    assert!(diag.message.contains("trailing comma"));
}

#[test]
fn function_declaration_binds_its_signature_in_scope() {
    let program = parse("fn add(a: i32, b: i32) -> i32 { return a + b; }");
    let Decl::Function(f) = &program.decls[0] else {
        panic!("expected a function declaration")
    };
    assert_eq!(f.name, "add");
    assert_eq!(f.params.len(), 2);
    assert_eq!(f.params[0].name, "a");
    assert_eq!(f.params[1].name, "b");

    let Stmt::Return(Some(ret_expr)) = &f.body.statements[0] else {
        panic!("expected a return statement")
    };
    assert!(matches!(
        &ret_expr.kind,
        ExprKind::Binary { op: Op::Add, .. }
    ));

    let scope = Scope::from_program(&program).unwrap();
    let symbol = scope.functions.get("add").expect("add should be bound");
    match &symbol.ty {
        Type::Function { params, return_type, .. } => {
            assert_eq!(params.len(), 2);
            assert!(matches!(**return_type, Type::Primitive { ref name, .. } if name == "i32"));
        }
        other => panic!("expected a function type, got {other:?}"),
    }
}

#[test]
fn if_else_nests_into_braced_branches() {
    let program = parse("fn main() { if (a > b) { return a; } else { return b; } }");
    let Decl::Function(f) = &program.decls[0] else {
        panic!("expected a function declaration")
    };
    let Stmt::If(if_stmt) = &f.body.statements[0] else {
        panic!("expected an if statement")
    };
    assert!(matches!(if_stmt.condition.kind, ExprKind::Binary { op: Op::Gt, .. }));
    assert_eq!(if_stmt.then_branch.statements.len(), 1);
    assert!(if_stmt.else_branch.is_some());
}

#[test]
fn if_without_braces_is_a_parse_error_pointing_at_the_body() {
    let err = compile("fn main() { if (1) return; }").unwrap_err();
    let CompileError::Parse(diag) = err else {
        panic!("expected a parse error")
    };
    let token = diag.token.expect("the error should carry an offending token");
    assert_eq!(token.lexeme, "return");
}

#[test]
fn duplicate_top_level_function_names_are_rejected() {
    let program = parse("fn f() {} fn f() {}");
    let err = Scope::from_program(&program).unwrap_err();
    assert!(matches!(err, CompileError::DuplicateSymbol { .. }));
}

#[test]
fn duplicate_top_level_variable_names_are_rejected() {
    let program = parse("x: i32 = 1; x: i32 = 2;");
    let err = Scope::from_program(&program).unwrap_err();
    assert!(matches!(err, CompileError::DuplicateSymbol { .. }));
}

#[test]
fn a_function_and_a_variable_may_share_a_name() {
    let program = parse("f: i32 = 1; fn f() {}");
    let scope = Scope::from_program(&program).unwrap();
    assert!(scope.variables.get("f").is_some());
    assert!(scope.functions.get("f").is_some());
}

#[test]
fn parse_consumes_the_entire_token_stream() {
    let program = parse("x: i32 = 1; y: i32 = 2; fn f() {}");
    assert_eq!(program.decls.len(), 3);
}

#[test]
fn assignment_is_right_associative() {
    let program = parse("fn f() { a = b = c; }");
    let Decl::Function(f) = &program.decls[0] else {
        panic!("expected a function declaration")
    };
    let Stmt::Expr(expr) = &f.body.statements[0] else {
        panic!("expected an expression statement")
    };
    let ExprKind::Assignment { op: Op::Assign, rvalue, .. } = &expr.kind else {
        panic!("expected an assignment")
    };
    assert!(matches!(rvalue.kind, ExprKind::Assignment { .. }));
}

#[test]
fn assigning_to_a_non_lvalue_is_a_parse_error() {
    for src in ["fn f() { 42 = x; }", "fn f() { (a + b) = x; }", "fn f() { g() = x; }"] {
        let err = compile(src).unwrap_err();
        let CompileError::Parse(diag) = err else {
            panic!("expected a parse error for {src:?}")
        };
        assert!(diag.message.to_lowercase().contains("lvalue"), "message was: {}", diag.message);
    }
}

#[test]
fn leading_const_marks_the_declaration_and_its_lowered_type() {
    let program = parse("x: const i32 = 7;");
    let Decl::Variable(v) = &program.decls[0] else {
        panic!("expected a variable declaration")
    };
    assert!(v.is_const);

    let scope = Scope::from_program(&program).unwrap();
    let symbol = scope.variables.get("x").unwrap();
    assert!(symbol.is_const);
    assert!(symbol.ty.is_const());
}

#[test]
fn unknown_character_is_a_lex_error() {
    let err = compile("x: i32 = \"hi\";").unwrap_err();
    assert!(matches!(err, CompileError::UnknownToken { ch: '"', .. }));
}

#[test]
fn iffy_lexes_as_a_single_identifier_not_keyword_plus_identifier() {
    let program = parse("iffy: i32 = 1;");
    let Decl::Variable(v) = &program.decls[0] else {
        panic!("expected a variable declaration")
    };
    assert_eq!(v.name, "iffy");
}
