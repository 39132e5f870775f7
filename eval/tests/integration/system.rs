//! Tests for system variables.

use kpl_eval::{Config, ErrorKind, Session};

use crate::{evaluate, run, session, session_with_config};

#[test]
fn default_values() {
    assert_eq!(run("⎕IO"), "1");
    assert_eq!(run("⎕PP"), "10");
    assert_eq!(run("⎕CT"), "1E¯10");
}

#[test]
fn index_origin_validation() {
    let mut session = session();
    let err = session.immediately_execute("⎕IO←2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
    assert_eq!(err.to_string(), "1:1: LimitError: ⎕IO must be 0 or 1, got 2");
    assert_eq!(session.index_origin(), 1);

    let err = session.immediately_execute("⎕IO←0.5").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    let err = session.immediately_execute("⎕IO←2 2⍴0").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rank);
    let err = session.immediately_execute("⎕IO←0 1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Length);
    let err = session.immediately_execute("⎕IO←'a'").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(session.index_origin(), 1);

    session.immediately_execute("⎕IO←0").unwrap();
    assert_eq!(session.index_origin(), 0);
    assert_eq!(evaluate(&mut session, "⍳3"), "0 1 2");
    assert_eq!(evaluate(&mut session, "⍋3 1 2"), "1 2 0");
    assert_eq!(evaluate(&mut session, "1⊃10 20"), "20");
}

#[test]
fn print_precision() {
    let mut session = session();
    assert_eq!(evaluate(&mut session, "○1"), "3.141592654");
    session.immediately_execute("⎕PP←3").unwrap();
    assert_eq!(session.print_precision(), 3);
    assert_eq!(evaluate(&mut session, "○1"), "3.14");
    assert_eq!(evaluate(&mut session, "1234"), "1.23E3");

    let err = session.immediately_execute("⎕PP←0").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
    let err = session.immediately_execute("⎕PP←100").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
    assert_eq!(session.print_precision(), 3);
}

#[test]
fn comparison_tolerance() {
    let mut session = session();
    assert_eq!(evaluate(&mut session, "1=1+1E¯9"), "0");
    session.immediately_execute("⎕CT←1E¯8").unwrap();
    assert_eq!(evaluate(&mut session, "1=1+1E¯9"), "1");
    session.immediately_execute("⎕CT←0").unwrap();
    assert_eq!(evaluate(&mut session, "1=1+1E¯15"), "0");

    let err = session.immediately_execute("⎕CT←¯1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    let err = session.immediately_execute("⎕CT←0.1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
    assert_eq!(session.comparison_tolerance(), 0.0);
}

#[test]
fn system_variables_in_dfns() {
    let mut session = session();
    session.immediately_execute("f←{⎕IO←0 ◊ ⍳⍵}").unwrap();
    assert_eq!(evaluate(&mut session, "f 3"), "0 1 2");
    // System variables are session-wide.
    assert_eq!(session.index_origin(), 0);
}

#[test]
fn unknown_system_variable() {
    let err = Session::new().immediately_execute("⎕XY").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    let err = Session::new().immediately_execute("⎕XY←1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn configured_initial_values() {
    let config = Config::default()
        .with_index_origin(0)
        .with_print_precision(4)
        .with_comparison_tolerance(0.0);
    let mut session = session_with_config(config);
    assert_eq!(evaluate(&mut session, "⎕IO ⎕PP ⎕CT"), "0 4 0");
    assert_eq!(evaluate(&mut session, "÷3"), "0.3333");
}

#[test]
fn invalid_config() {
    let err = Session::with_config(Config::default().with_index_origin(5)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
    let config = Config::default().with_max_print_precision(5).with_print_precision(6);
    assert!(Session::with_config(config).is_err());
}
