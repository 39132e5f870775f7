use assert_matches::assert_matches;

use super::*;
use crate::{ErrorKind, Expr, FnExpr, Statement};


/// Resolver with a fixed set of function names.
#[derive(Debug)]
struct Functions(&'static [&'static str]);

impl NameResolver for Functions {
    fn current_class(&self, name: &str) -> Option<NameClass> {
        self.0.contains(&name).then_some(NameClass::Function)
    }
}

fn parse_ok(code: &str) -> Block {
    parse_code(code, &()).unwrap()
}

fn single_expr(code: &str) -> SpannedExpr {
    let mut block = parse_ok(code);
    assert_eq!(block.statements.len(), 1, "{block:#?}");
    match block.statements.pop().unwrap() {
        Statement::Expr(expr) => expr,
        Statement::Function(function) => panic!("Unexpected function: {function:#?}"),
    }
}

fn single_function(code: &str) -> SpannedFnExpr {
    let mut block = parse_ok(code);
    assert_eq!(block.statements.len(), 1, "{block:#?}");
    match block.statements.pop().unwrap() {
        Statement::Function(function) => function,
        Statement::Expr(expr) => panic!("Unexpected expression: {expr:#?}"),
    }
}

fn parse_err(code: &str) -> Error {
    let err = parse_code(code, &()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax, "{err}");
    err
}

fn number(expr: &SpannedExpr) -> f64 {
    match expr.extra {
        Expr::Number(number) => {
            assert_eq!(number.im, 0.0);
            number.re
        }
        ref other => panic!("Expected number, got {other:?}"),
    }
}

fn numbers(expr: &SpannedExpr) -> Vec<f64> {
    match &expr.extra {
        Expr::Vector(items) => items.iter().map(number).collect(),
        _ => vec![number(expr)],
    }
}

fn primitive(function: &SpannedFnExpr) -> Primitive {
    match function.extra {
        FnExpr::Primitive(primitive) => primitive,
        ref other => panic!("Expected primitive, got {other:?}"),
    }
}

#[test]
fn empty_code_produces_empty_block() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok(" ⍝ comment\n ⋄ ").is_empty());
}

#[test]
fn resolver_classifies_unknown_names() {
    let block = parse_code("f x", &Functions(&["f"])).unwrap();
    assert_matches!(
        &block.statements[0],
        Statement::Expr(expr) if matches!(&expr.extra, Expr::Monadic { function, .. }
            if function.extra == FnExpr::Variable("f".into()))
    );

    // Without the resolver, both names are arrays forming a strand.
    let expr = single_expr("f x");
    assert_matches!(&expr.extra, Expr::Vector(items) if items.len() == 2);
}

#[test]
fn names_assigned_in_code_take_precedence() {
    let block = parse_code("f←1 ⋄ f", &Functions(&["f"])).unwrap();
    assert_matches!(
        &block.statements[1],
        Statement::Expr(expr) if expr.extra == Expr::Variable("f".into())
    );
}
