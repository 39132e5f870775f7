//! Integration tests for the interpreter.

use std::{cell::RefCell, io, rc::Rc};

use kpl_eval::{Array, Config, Error, Session};

mod dfns;
mod errors;
mod operators;
mod scalar;
mod structural;
mod system;

/// Output sink shared between a session and the test.
#[derive(Debug, Clone, Default)]
struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl io::Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn session() -> Session {
    Session::new().with_output(io::sink())
}

fn session_with_output() -> (Session, SharedOutput) {
    let output = SharedOutput::default();
    let session = Session::new().with_output(output.clone());
    (session, output)
}

fn session_with_config(config: Config) -> Session {
    Session::with_config(config).unwrap().with_output(io::sink())
}

fn try_evaluate(session: &mut Session, code: &str) -> Result<Option<Array>, Error> {
    session.immediately_execute(code)
}

/// Evaluates the code and returns its formatted value.
fn evaluate(session: &mut Session, code: &str) -> String {
    let value = try_evaluate(session, code)
        .unwrap_or_else(|err| panic!("Error evaluating `{code}`: {err}"))
        .unwrap_or_else(|| panic!("`{code}` has not produced a value"));
    session.format(&value)
}

fn run(code: &str) -> String {
    evaluate(&mut session(), code)
}

fn run_err(code: &str) -> Error {
    try_evaluate(&mut session(), code).unwrap_err()
}

#[test]
fn statements_are_evaluated_in_order() {
    let mut session = session();
    assert_eq!(evaluate(&mut session, "x←3 ◊ y←x×2 ◊ x+y"), "9");
    assert_eq!(evaluate(&mut session, "x"), "3");
    assert_eq!(evaluate(&mut session, "y⋄x"), "3");
}

#[test]
fn assignments_are_shy() {
    let mut session = session();
    assert!(try_evaluate(&mut session, "x←1 2 3").unwrap().is_none());
    assert_eq!(evaluate(&mut session, "⍴x"), "3");
    assert_eq!(evaluate(&mut session, "1+x←5"), "6");
    assert_eq!(evaluate(&mut session, "x"), "5");
}

#[test]
fn intermediate_values_are_written_to_output() {
    let (mut session, output) = session_with_output();
    let value = session.immediately_execute("1 2 3 ◊ x←4 ◊ x×2").unwrap();
    assert_eq!(session.format(&value.unwrap()), "8");
    assert_eq!(output.contents(), "1 2 3\n");
}

#[test]
fn quad_output() {
    let (mut session, output) = session_with_output();
    let value = session.immediately_execute("1+⎕←2 2⍴⍳4").unwrap();
    assert!(value.is_some());
    assert_eq!(output.contents(), "1 2\n3 4\n");

    let value = session.immediately_execute("⎕←'hello'").unwrap();
    assert!(value.is_none());
    assert_eq!(output.contents(), "1 2\n3 4\nhello\n");
}

#[test]
fn strings_and_chars() {
    assert_eq!(run("'hello'"), "hello");
    assert_eq!(run("⍴'hello'"), "5");
    assert_eq!(run("⍴'h'"), "");
    assert_eq!(run("⌽'abc'"), "cba");
    assert_eq!(run("'abc'='abd'"), "1 1 0");
}

#[test]
fn multiline_code() {
    let code = unindent::unindent(
        "
        sum←{
          ⍺←0
          ⍺+⍵
        }
        sum 5
        ",
    );
    assert_eq!(run(&code), "5");
}

#[test]
fn variables_from_host_code() {
    let mut session = session();
    session.insert_variable("data", Array::from_reals([3.0, 1.0, 2.0]));
    assert_eq!(evaluate(&mut session, "data[⍋data]"), "1 2 3");
}

#[test]
fn multiple_sessions_coexist() {
    let mut zero_based = session_with_config(Config::default().with_index_origin(0));
    let mut one_based = session();
    assert_eq!(evaluate(&mut zero_based, "⍳3"), "0 1 2");
    assert_eq!(evaluate(&mut one_based, "⍳3"), "1 2 3");
}
