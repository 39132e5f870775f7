//! E2E tests for the `kpl` binary.

use unindent::unindent;

use std::{
    fs,
    io::Write,
    path::PathBuf,
    process::{Command, Output, Stdio},
};

fn kpl() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_kpl"));
    command.env("COLOR", "never").env_remove("RUST_LOG");
    command
}

fn run(args: &[&str]) -> Output {
    kpl().args(args).output().expect("cannot run kpl")
}

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = kpl()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("cannot spawn kpl");
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(input.as_bytes()).unwrap();
    drop(stdin);
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn write_file(name: &str, contents: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn evaluating_code_from_args() {
    let output = run(&["-e", "+/⍳100"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "5050\n");

    let output = run(&["-e", "x←2 3⍴⍳6 ⋄ ⎕←+/x ⋄ ⍴x"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "6 15\n2 3\n");
}

#[test]
fn initial_system_values() {
    let output = run(&["--io", "0", "-e", "⍳3"]);
    assert_eq!(stdout(&output), "0 1 2\n");
    let output = run(&["--pp", "3", "-e", "○1"]);
    assert_eq!(stdout(&output), "3.14\n");
    let output = run(&["--ct", "1E-8", "-e", "1=1+1E¯9"]);
    assert_eq!(stdout(&output), "1\n");
}

#[test]
fn invalid_options() {
    let output = run(&["--io", "2", "-e", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("⎕IO"), "{}", stderr(&output));

    let output = run(&["--unknown"]);
    assert_eq!(output.status.code(), Some(1));
    let output = run(&["--color", "sometimes", "-e", "1"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn evaluation_errors() {
    let output = run(&["-e", "1 2 3 + 4 ÷ 0"]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("error[DomainError]"), "{err}");
    assert!(err.contains("Error occurred here"), "{err}");

    let output = run(&["-e", "(1 2"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("error[SyntaxError]"));

    let output = run(&["-e", "⎕"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("error[NotImplemented]"));
}

#[test]
fn statements_before_error_are_evaluated() {
    let output = run(&["-e", "⎕←1 ⋄ 2 ⋄ ÷0 ⋄ 3"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "1\n2\n");
}

#[test]
fn running_files() {
    let code = unindent(
        "
        ⍝ Collatz sequence length
        collatz←{
          ⍵=1: 0
          0=2|⍵: 1+∇ ⍵÷2
          1+∇ 1+3×⍵
        }
        collatz 27
        sum←+/
        sum collatz¨⍳5
        ",
    );
    let path = write_file("collatz.kpl", &code);
    let output = run(&[path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "111\n15\n");
}

#[test]
fn file_errors() {
    let path = write_file("script.txt", "1+1");
    let output = run(&[path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("error[FileError]"));

    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("missing.kpl");
    let output = run(&[path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("error[FileError]"), "{err}");
    assert!(err.contains("Cannot read"), "{err}");
}

#[test]
fn errors_in_files_are_located() {
    let code = "f←{1÷⍵}\nf 2\nf 0\n";
    let path = write_file("division.kpl", code);
    let output = run(&[path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "0.5\n");
    let err = stderr(&output);
    assert!(err.contains("error[DomainError]"), "{err}");
    assert!(err.contains("division.kpl:1:"), "{err}");
}

#[test]
fn reading_code_from_stdin() {
    let output = run_with_stdin(&[], "a←⍳4\n⌽a\n");
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "4 3 2 1\n");
}

#[test]
fn interactive_session() {
    let input = "x←10\nx×2\nf←{\n⍵+x\n}\nf 5\n÷0\nf 1\n";
    let output = run_with_stdin(&["-i"], input);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("20"), "{out}");
    assert!(out.contains("15"), "{out}");
    assert!(out.contains("11"), "{out}");
    let err = stderr(&output);
    assert!(err.contains("kpl REPL"), "{err}");
    assert!(err.contains("error[DomainError]"), "{err}");
}

#[test]
fn interactive_session_after_code() {
    let output = run_with_stdin(&["-e", "y←3", "-i"], "y*2\n");
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains('9'));
}

#[test]
fn errors_in_dfns_refer_to_defining_snippet() {
    let input = "g←{⍵÷0}\n1 2 3 4 5 6 7 8 9\ng 1\n";
    let output = run_with_stdin(&["-i"], input);
    assert!(output.status.success(), "{}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("error[DomainError]"), "{err}");
    assert!(err.contains("Snip #1:1:"), "{err}");
    assert!(!err.contains("Snip #3"), "{err}");
}
