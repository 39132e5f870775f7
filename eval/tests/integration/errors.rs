//! Tests for error classification and locations.

use kpl_eval::{ErrorKind, Session};

use crate::{evaluate, run_err, session};

#[test]
fn undefined_names() {
    let err = run_err("foo+1");
    assert_eq!(err.kind(), ErrorKind::Value);
    assert_eq!(err.message(), "Undefined name `foo`");
    assert_eq!(err.location().unwrap().range(), 0..3);
}

#[test]
fn syntax_errors() {
    assert_eq!(run_err("(1 2").kind(), ErrorKind::Syntax);
    assert_eq!(run_err("1 2)").kind(), ErrorKind::Syntax);
    assert_eq!(run_err("{⍵+1").kind(), ErrorKind::Syntax);
    assert_eq!(run_err("1 +").kind(), ErrorKind::Syntax);
    assert_eq!(run_err("←5").kind(), ErrorKind::Syntax);
}

#[test]
fn definition_errors() {
    let mut session = session();
    // `g` is unknown when `f` is parsed, so it is classified as a variable.
    session.immediately_execute("f←{g ⍵}").unwrap();
    session.immediately_execute("g←{⍵+1}").unwrap();
    let err = session.immediately_execute("f 1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Definition);
    assert_eq!(err.message(), "`g` is a function, not an array");

    session.immediately_execute("x←5").unwrap();
    assert_eq!(evaluate(&mut session, "g x"), "6");
}

#[test]
fn not_implemented_constructs() {
    let err = run_err("⎕");
    assert_eq!(err.kind(), ErrorKind::NotImplemented);
    assert_eq!(err.kind().to_string(), "NotImplemented");
    assert_eq!(run_err("1 0⍉2 2⍴0").kind(), ErrorKind::NotImplemented);
}

#[test]
fn functions_without_forms() {
    let err = run_err("1 2∩");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    let err = run_err("∩1 2");
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert!(err.message().contains("monadically"), "{err}");
    let err = run_err("1 ⍨2");
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn errors_in_dfns_are_located() {
    let mut session = session();
    session.immediately_execute("f←{1÷⍵}").unwrap();
    let code = "1 + f 0";
    let err = session.immediately_execute(code).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    let location = err.location().unwrap();
    // The location points into the code that defined the dfn.
    assert_eq!(location.code("f←{1÷⍵}"), Some("1÷⍵"));
}

#[test]
fn errors_in_primitives_are_located() {
    let code = "1 2 3 + 4 ÷ 0";
    let err = run_err(code);
    assert_eq!(err.kind(), ErrorKind::Domain);
    let location = err.location().unwrap();
    assert_eq!(location.code(code), Some("4 ÷ 0"));
}

#[test]
fn session_survives_errors() {
    let mut session = Session::new().with_output(std::io::sink());
    session.immediately_execute("x←1").unwrap();
    session.immediately_execute("x←÷0").unwrap_err();
    assert_eq!(evaluate(&mut session, "x"), "1");
    session.immediately_execute("f←{÷⍵} ◊ f 0").unwrap_err();
    assert_eq!(evaluate(&mut session, "f 4"), "0.25");
}

#[test]
fn error_display() {
    let err = run_err("1 2 3+4 5");
    assert_eq!(
        err.to_string(),
        "1:1: SyntaxError: Mismatched left and right shapes"
    );
}
