//! Tests for operators.

use assert_matches::assert_matches;
use kpl_eval::ErrorKind;

use crate::{evaluate, run, run_err, session};

#[test]
fn reduction_is_right_fold() {
    assert_eq!(run("-/1 2 3 4"), "¯2");
    assert_eq!(run("÷/2 4 8"), "4");
    assert_eq!(run("+/5"), "5");
    assert_eq!(run("+/2 3⍴⍳6"), "6 15");
    assert_eq!(run("+⌿2 3⍴⍳6"), "5 7 9");
    assert_eq!(run("⌈/3 1 4 1 5"), "5");
}

#[test]
fn reduction_of_empty_arguments() {
    assert_eq!(run("+/⍳0"), "0");
    assert_eq!(run("×/⍳0"), "1");
    assert_eq!(run("∧/⍳0"), "1");
    assert_eq!(run("⍴+/0 3⍴0"), "0");

    let err = run_err("⍟/⍳0");
    assert_matches!(err.kind(), ErrorKind::Domain);
    assert!(err.message().contains("identity"), "{err}");
}

#[test]
fn reduction_with_dfn() {
    assert_eq!(run("{⍺+2×⍵}/1 2 3"), "17");
    assert_eq!(run("{⍺,⍵}/1 2 3"), "┌─────┐\n│1 2 3│\n└─────┘");
}

#[test]
fn scan() {
    assert_eq!(run("+\\1 2 3 4"), "1 3 6 10");
    assert_eq!(run("-\\1 2 3"), "1 ¯1 2");
    assert_eq!(run("+⍀2 3⍴⍳6"), "1 2 3\n5 7 9");
    assert_eq!(run("∨\\0 0 1 0"), "0 0 1 1");
}

#[test]
fn each() {
    assert_eq!(run("⍴¨(1 2)(3 4 5)"), "┌─┬─┐\n│2│3│\n└─┴─┘");
    assert_eq!(run("≢¨(1 2)(3 4 5)"), "2 3");
    assert_eq!(run("1 2 3{⍺+⍵}¨4 5 6"), "5 7 9");
    assert_eq!(run("+/¨(1 2)(3 4 5)"), "3 12");
    assert_eq!(run("2↑¨(1 2 3)(4 5 6)"), "┌───┬───┐\n│1 2│4 5│\n└───┴───┘");
    assert_eq!(run_err("1 2{⍺+⍵}¨1 2 3").kind(), ErrorKind::Length);
}

#[test]
fn commute() {
    assert_eq!(run("×⍨3"), "9");
    assert_eq!(run("2-⍨10"), "8");
    assert_eq!(run("3⍴⍨2"), "3 3");
}

#[test]
fn outer_product() {
    assert_eq!(run("1 2∘.×1 2 3"), "1 2 3\n2 4 6");
    assert_eq!(run("⍴(⍳3)∘.+⍳4"), "3 4");
    assert_eq!(run("(⍳3)∘.=⍳3"), "1 0 0\n0 1 0\n0 0 1");
}

#[test]
fn inner_product() {
    assert_eq!(run("1 2 3 +.× 4 5 6"), "32");
    assert_eq!(run("(2 2⍴1 2 3 4)+.×2 2⍴5 6 7 8"), "19 22\n43 50");
    assert_eq!(run("1 2 3∧.=1 2 3"), "1");
    assert_eq!(run("2+.×1 2 3"), "12");
    assert_eq!(run_err("1 2+.×1 2 3").kind(), ErrorKind::Length);
}

#[test]
fn compose() {
    assert_eq!(run("2∘×3"), "6");
    assert_eq!(run("-∘2 5"), "3");
    assert_eq!(run("(-∘⌊)2.5"), "¯2");
    assert_eq!(run("1 2(+∘÷)2 4"), "1.5 2.25");
    assert_eq!(run_err("1 (2∘×) 3").kind(), ErrorKind::Domain);
}

#[test]
fn atop_and_over() {
    assert_eq!(run("(-⍤⌊)2.5"), "¯2");
    assert_eq!(run("3(-⍤+)4"), "¯7");
    assert_eq!(run("¯3(+⍥|)4"), "7");
    assert_eq!(run_err("(-⍤1)2").kind(), ErrorKind::NotImplemented);
}

#[test]
fn power_with_count() {
    assert_eq!(run("(×∘2)⍣3⊢1"), "8");
    assert_eq!(run("{⍵+1}⍣0⊢5"), "5");
    assert_eq!(run("2(×⍣3)1"), "8");
    assert_eq!(run_err("{⍵+1}⍣¯1⊢5").kind(), ErrorKind::Domain);
    assert_eq!(run_err("{⍵+1}⍣(1 2)⊢5").kind(), ErrorKind::Domain);
}

#[test]
fn power_with_fixpoint() {
    assert_eq!(run("{1+÷⍵}⍣=1"), "1.618033989");
    assert_eq!(run("{⌊⍵÷2}⍣=100"), "0");
}

#[test]
fn operators_with_named_functions() {
    let mut session = session();
    session
        .immediately_execute("sum←+/ ◊ sq←{⍵×⍵}")
        .unwrap();
    assert_eq!(evaluate(&mut session, "sum sq¨⍳3"), "14");
    assert_eq!(evaluate(&mut session, "sq⍣2⊢3"), "81");
    assert_eq!(evaluate(&mut session, "1 2 sq⍨⍤+ 3"), "16 25");
}

#[test]
fn array_operands() {
    assert_eq!(run_err("1∘2").kind(), ErrorKind::Syntax);
}
