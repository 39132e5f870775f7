//! Tests for scalar (pervasive) functions.

use assert_matches::assert_matches;
use kpl_eval::ErrorKind;

use crate::{run, run_err};

#[test]
fn conjugate_of_real_vector() {
    assert_eq!(run("+2 3 5"), "2 3 5");
    assert_eq!(run("+3J4"), "3J¯4");
}

#[test]
fn floor_with_tolerance() {
    assert_eq!(
        run("⌊¯3.1416 3.1416 .99999999999 5E20 ¯0.5E¯10"),
        "¯4 3 1 5E20 0"
    );
    assert_eq!(run("⌈¯3.1416 3.1416 1.00000000001"), "¯3 4 1");
}

#[test]
fn basic_arithmetic() {
    assert_eq!(run("1 2 3 + 4 5 6"), "5 7 9");
    assert_eq!(run("10 - 1 2 3"), "9 8 7");
    assert_eq!(run("2 × 3 ¯4"), "6 ¯8");
    assert_eq!(run("×¯5 0 2"), "¯1 0 1");
    assert_eq!(run("1 ÷ 4"), "0.25");
    assert_eq!(run("÷2 4"), "0.5 0.25");
    assert_eq!(run("2*10"), "1024");
    assert_eq!(run("|¯3 4"), "3 4");
    assert_eq!(run("3|7 ¯7"), "1 2");
    assert_eq!(run("3⌈1 5"), "3 5");
    assert_eq!(run("3⌊1 5"), "1 3");
}

#[test]
fn right_to_left_evaluation() {
    assert_eq!(run("2×3+4"), "14");
    assert_eq!(run("(2×3)+4"), "10");
    assert_eq!(run("-1-1"), "0");
}

#[test]
fn division_by_zero() {
    let err = run_err("÷0");
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(err.kind().to_string(), "DomainError");

    let err = run_err("1 2÷0 1");
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(run("0÷0"), "1");
}

#[test]
fn overflowing_arithmetic() {
    let err = run_err("1E308×10");
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(err.message(), "Result of `×` is not a finite number");
    let err = run_err("(1E308×10)-1E308×10");
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(run_err("1E308+1E308").kind(), ErrorKind::Domain);
    assert_eq!(run_err("2*1E4").kind(), ErrorKind::Domain);
    assert_eq!(run_err("+/1E308 1E308").kind(), ErrorKind::Domain);
    assert_eq!(run("1E307×10"), "1E308");
}

#[test]
fn scalar_extension() {
    assert_eq!(run("1+2 2⍴⍳4"), "2 3\n4 5");
    assert_eq!(run("(⊂1 2)+10 20"), "┌─────┬─────┐\n│11 12│21 22│\n└─────┴─────┘");
    assert_eq!(run("(2 2⍴⍳4)×10"), "10 20\n30 40");
}

#[test]
fn pervasion_into_nested_arrays() {
    assert_eq!(run("≡1+(1 2)(3 (4 5))"), "3");
    assert_eq!(run("∊10×(1 2)(3 (4 5))"), "10 20 30 40 50");
    assert_eq!(run("∊(1 2)(3 4)+10 20"), "11 12 23 24");
}

#[test]
fn mismatched_shapes() {
    let err = run_err("1 2 3+4 5");
    assert_matches!(err.kind(), ErrorKind::Syntax);
    assert!(err.message().contains("shapes"), "{err}");
}

#[test]
fn exponentials_and_logarithms() {
    assert_eq!(run("⍟1"), "0");
    assert_eq!(run("2⍟8"), "3");
    assert_eq!(run("10⍟1000"), "3");
    assert_eq!(run("*0"), "1");
    assert_eq!(run("¯1*0.5"), "0J1");
    assert_eq!(run_err("⍟0").kind(), ErrorKind::Domain);
}

#[test]
fn factorial_and_binomial() {
    assert_eq!(run("!0 1 5"), "1 1 120");
    assert_eq!(run("2!5"), "10");
    assert_eq!(run("!0.5"), "0.8862269255");
}

#[test]
fn circular_functions() {
    assert_eq!(run("○1"), "3.141592654");
    assert_eq!(run("1○0"), "0");
    assert_eq!(run("2○0"), "1");
    assert_eq!(run("¯3○1"), "0.7853981634");
    assert_eq!(run("3 4○0"), "0 1");
    assert_eq!(run("9 11○3J4"), "3 4");
    assert_eq!(run_err("13○1").kind(), ErrorKind::Domain);
}

#[test]
fn comparisons() {
    assert_eq!(run("1 2 3<2"), "1 0 0");
    assert_eq!(run("1 2 3≤2"), "1 1 0");
    assert_eq!(run("1 2 3=2"), "0 1 0");
    assert_eq!(run("1 2 3≠2"), "1 0 1");
    assert_eq!(run("1 2 3≥2"), "0 1 1");
    assert_eq!(run("1 2 3>2"), "0 0 1");
    // Tolerant equality
    assert_eq!(run("1=1+1E¯12"), "1");
    assert_eq!(run("1=1+1E¯8"), "0");
    assert_eq!(run("'a'=1"), "0");
}

#[test]
fn boolean_functions() {
    assert_eq!(run("0 0 1 1∧0 1 0 1"), "0 0 0 1");
    assert_eq!(run("0 0 1 1∨0 1 0 1"), "0 1 1 1");
    assert_eq!(run("0 0 1 1⍲0 1 0 1"), "1 1 1 0");
    assert_eq!(run("0 0 1 1⍱0 1 0 1"), "1 0 0 0");
    assert_eq!(run("~1 0"), "0 1");
    assert_eq!(run_err("~2").kind(), ErrorKind::Domain);
    assert_eq!(run_err("2⍲1").kind(), ErrorKind::Domain);
}

#[test]
fn gcd_and_lcm() {
    assert_eq!(run("12∨18"), "6");
    assert_eq!(run("4∧6"), "12");
}

#[test]
fn complex_arithmetic() {
    assert_eq!(run("1J2×3J4"), "¯5J10");
    assert_eq!(run("|3J4"), "5");
    assert_eq!(run("1J1+1J¯1"), "2");
}

#[test]
fn chars_in_arithmetic() {
    assert_eq!(run_err("'a'+1").kind(), ErrorKind::Domain);
}
