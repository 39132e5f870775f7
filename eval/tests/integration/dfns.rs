//! Tests for dfns: scoping, guards, default arguments and recursion.

use assert_matches::assert_matches;
use kpl_eval::{ErrorKind, Referent, ScopeId};

use crate::{evaluate, run, run_err, session};

#[test]
fn nested_dfn_scoping() {
    assert_eq!(run("Fn←{q←{2-⍵} ◊ 1 - q⍵} ◊ Fn 2"), "1");
}

#[test]
fn dfn_locals_do_not_leak() {
    let mut session = session();
    session.immediately_execute("x←1 ◊ f←{x←10 ◊ x+⍵}").unwrap();
    assert_eq!(evaluate(&mut session, "f 5"), "15");
    assert_eq!(evaluate(&mut session, "x"), "1");
    assert_matches!(
        session.scopes().lookup(ScopeId::ROOT, "f"),
        Some(Referent::Function(_))
    );
}

#[test]
fn dfns_see_enclosing_scope() {
    let mut session = session();
    session.immediately_execute("k←3 ◊ add←{⍵+k}").unwrap();
    assert_eq!(evaluate(&mut session, "add 1"), "4");
    session.immediately_execute("k←10").unwrap();
    assert_eq!(evaluate(&mut session, "add 1"), "11");
}

#[test]
fn closures_capture_defining_scope() {
    let code = "outer←{n←⍵ ◊ inner←{⍵+n} ◊ inner 1} ◊ outer 41";
    assert_eq!(run(code), "42");
}

#[test]
fn dyadic_dfns() {
    assert_eq!(run("2{⍺×⍵}3"), "6");
    assert_eq!(run("f←{⍺-⍵} ◊ 10 f 3"), "7");
}

#[test]
fn default_left_argument() {
    let mut session = session();
    session.immediately_execute("f←{⍺←100 ◊ ⍺+⍵}").unwrap();
    assert_eq!(evaluate(&mut session, "f 1"), "101");
    assert_eq!(evaluate(&mut session, "1 f 1"), "2");
}

#[test]
fn guards() {
    let mut session = session();
    session
        .immediately_execute("sign←{⍵<0:¯1 ◊ ⍵=0:0 ◊ 1}")
        .unwrap();
    assert_eq!(evaluate(&mut session, "sign ¯5"), "¯1");
    assert_eq!(evaluate(&mut session, "sign 0"), "0");
    assert_eq!(evaluate(&mut session, "sign 7"), "1");
    assert_eq!(evaluate(&mut session, "sign¨¯2 0 2"), "¯1 0 1");

    let err = session.immediately_execute("sign 1 2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert!(err.message().contains("Guard"), "{err}");
}

#[test]
fn recursion() {
    let mut session = session();
    session
        .immediately_execute("fact←{⍵≤1:1 ◊ ⍵×∇ ⍵-1}")
        .unwrap();
    assert_eq!(evaluate(&mut session, "fact 10"), "3628800");

    let fib = "fib←{⍵<2:⍵ ◊ (∇ ⍵-1)+∇ ⍵-2} ◊ fib¨⍳10";
    assert_eq!(evaluate(&mut session, fib), "1 1 2 3 5 8 13 21 34 55");
}

#[test]
fn recursion_by_name() {
    let code = "len←{0=≢⍵:0 ◊ 1+len 1↓⍵} ◊ len 'hello'";
    assert_eq!(run(code), "5");
}

#[test]
fn first_value_terminates_dfn() {
    assert_eq!(run("{⍵+1 ◊ ⍵+2}5"), "6");
}

#[test]
fn dfn_with_only_assignments() {
    assert_eq!(run("{x←⍵×2}5"), "10");
    assert_eq!(run("1+{x←⍵×2}5"), "11");
}

#[test]
fn dfn_without_value() {
    let err = run_err("{f←{⍵}}5");
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn missing_arguments() {
    let err = run_err("{⍺+⍵}5");
    assert_eq!(err.kind(), ErrorKind::Value);
    assert!(err.message().contains('⍺'), "{err}");

    let err = run_err("⍵+1");
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn recursion_outside_dfn() {
    let err = run_err("∇ 1");
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn arguments_are_local_to_call() {
    let mut session = session();
    session
        .immediately_execute("outer←{inner←{⍺←0 ◊ ⍺+⍵} ◊ inner ⍵}")
        .unwrap();
    assert_eq!(evaluate(&mut session, "1 outer 2"), "2");
}

#[test]
fn multiline_dfn() {
    let code = unindent::unindent(
        "
        collatz←{
          ⍝ Number of steps to reach 1
          ⍵=1:0
          0=2|⍵:1+∇ ⍵÷2
          1+∇ 1+3×⍵
        }
        collatz 27
        ",
    );
    assert_eq!(run(&code), "111");
}
