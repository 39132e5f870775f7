//! Tests for structural functions.

use kpl_eval::{Config, ErrorKind};

use crate::{evaluate, run, run_err, session, session_with_config};

#[test]
fn shape_and_reshape() {
    assert_eq!(run("⍴1 2 3"), "3");
    assert_eq!(run("⍴5"), "");
    assert_eq!(run("2 3⍴⍳4"), "1 2 3\n4 1 2");
    assert_eq!(run("⍴2 3 4⍴0"), "2 3 4");
    assert_eq!(run("2 2⍴'ab'"), "ab\nab");
    assert_eq!(run("3⍴⍳0"), "0 0 0");
    assert_eq!(run_err("¯1⍴1").kind(), ErrorKind::Domain);
}

#[test]
fn ravel_reshape_round_trip() {
    let mut session = session();
    for code in ["A←2 3 4⍴⍳24", "A←'abcdef'", "A←7", "A←3 2⍴(1 2)(3 4) 5", "A←0 4⍴0"] {
        session.immediately_execute(code).unwrap();
        assert_eq!(evaluate(&mut session, "(,A)≡,(⍴A)⍴,A"), "1", "{code}");
        assert_eq!(evaluate(&mut session, "A≡(⍴A)⍴,A"), "1", "{code}");
    }
}

#[test]
fn index_generator_and_origin() {
    for n in [0_u64, 1, 5, 100] {
        let mut session = session();
        let sum = evaluate(&mut session, &format!("+/⍳{n}"));
        assert_eq!(sum, (n * (n + 1) / 2).to_string());

        let mut session = session_with_config(Config::default().with_index_origin(0));
        let sum = evaluate(&mut session, &format!("+/⍳{n}"));
        assert_eq!(sum, (n * n.saturating_sub(1) / 2).to_string());
    }
}

#[test]
fn index_of() {
    assert_eq!(run("10 20 30⍳20 40"), "2 4");
    assert_eq!(run("'hello'⍳'l'"), "3");

    let mut session = session();
    assert_eq!(evaluate(&mut session, "⎕IO←0 ◊ 10 20 30⍳30 10"), "2 0");
}

#[test]
fn index_generator_errors() {
    assert_eq!(run_err("⍳2 3").kind(), ErrorKind::Rank);
    assert_eq!(run_err("⍳¯1").kind(), ErrorKind::Domain);
    assert_eq!(run_err("⍳1.5").kind(), ErrorKind::Domain);
    assert_eq!(run_err("⍳,3").kind(), ErrorKind::Rank);
    assert_eq!(run_err("⍳⍳0").kind(), ErrorKind::Rank);
}

#[test]
fn oversized_arrays() {
    let err = run_err("⍴1E10 1E10⍴1");
    assert_eq!(err.kind(), ErrorKind::Limit);
    assert!(err.message().contains("exceeds the limit"), "{err}");

    for code in [
        "1E10 1E10 0⍴1",
        "⍳1E15",
        "1E15↑1",
        "2 1E15↑1 1⍴1",
        "1E10/1",
        "(⍳1E4)∘.+⍳1E4",
    ] {
        assert_eq!(run_err(code).kind(), ErrorKind::Limit, "{code}");
    }
}

#[test]
fn configured_array_len_limit() {
    let mut session = session_with_config(Config::default().with_max_array_len(100));
    assert_eq!(evaluate(&mut session, "⍴10 10⍴1"), "10 10");
    assert_eq!(evaluate(&mut session, "⍴0 100⍴1"), "0 100");
    session.immediately_execute("V←⍳100 ◊ M←10 10⍴V").unwrap();

    for code in [
        "10 11⍴1",
        "0 101⍴1",
        "⍳101",
        "101↑V",
        "2/V",
        "V,1",
        "↑(⍳60)(⍳2)",
        "(⍳11)∘.×⍳10",
        "(11 1⍴1)+.×1 10⍴1",
        "V[10 11⍴1]",
    ] {
        let err = session.immediately_execute(code).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Limit, "{code}");
    }
    let err = session.immediately_execute("10 11⍴1").unwrap_err();
    assert_eq!(
        err.message(),
        "Array of shape [10, 11] exceeds the limit of 100 elements"
    );
    assert_eq!(evaluate(&mut session, "+/,M[⍳10;⍳10]"), "5050");
}

#[test]
fn reversal_and_rotation() {
    assert_eq!(run("⌽1 2 3"), "3 2 1");
    assert_eq!(run("⌽2 3⍴⍳6"), "3 2 1\n6 5 4");
    assert_eq!(run("⊖2 3⍴⍳6"), "4 5 6\n1 2 3");
    assert_eq!(run("1⌽1 2 3 4"), "2 3 4 1");
    assert_eq!(run("¯1⌽1 2 3 4"), "4 1 2 3");
    assert_eq!(run("1 2⌽2 3⍴⍳6"), "2 3 1\n6 4 5");
    assert_eq!(run("1⊖3 2⍴⍳6"), "3 4\n5 6\n1 2");
    assert_eq!(run_err("1 2 3⌽2 3⍴⍳6").kind(), ErrorKind::Length);
}

#[test]
fn ravel_and_catenation() {
    assert_eq!(run(",2 2⍴⍳4"), "1 2 3 4");
    assert_eq!(run("⍴⍪1 2 3"), "3 1");
    assert_eq!(run("1 2,3 4 5"), "1 2 3 4 5");
    assert_eq!(run("0,1 2"), "0 1 2");
    assert_eq!(run("(2 2⍴⍳4),9"), "1 2 9\n3 4 9");
    assert_eq!(run("(2 2⍴⍳4)⍪5 6"), "1 2\n3 4\n5 6");
    assert_eq!(run("'ab','cd'"), "abcd");
    assert_eq!(run_err("(2 2⍴⍳4),1 2 3").kind(), ErrorKind::Length);
}

#[test]
fn take_and_drop() {
    assert_eq!(run("2↑1 2 3"), "1 2");
    assert_eq!(run("¯2↑1 2 3"), "2 3");
    assert_eq!(run("5↑1 2 3"), "1 2 3 0 0");
    assert_eq!(run("¯5↑'abc'"), "  abc");
    assert_eq!(run("2 2↑3 3⍴⍳9"), "1 2\n4 5");
    assert_eq!(run("1↓1 2 3"), "2 3");
    assert_eq!(run("¯1↓1 2 3"), "1 2");
    assert_eq!(run("⍴5↓1 2 3"), "0");
    assert_eq!(run("1 1↓3 3⍴⍳9"), "5 6\n8 9");
    assert_eq!(run_err("1 2 3↑1 2").kind(), ErrorKind::Rank);
}

#[test]
fn mix_and_split() {
    assert_eq!(run("↑(1 2)(3 4 5)"), "1 2 0\n3 4 5");
    assert_eq!(run("↑'ab' 'cde'"), "ab \ncde");
    assert_eq!(run("⍴↓2 3⍴⍳6"), "2");
    assert_eq!(run("↑↓2 3⍴⍳6"), "1 2 3\n4 5 6");
}

#[test]
fn transpose() {
    assert_eq!(run("⍉2 3⍴⍳6"), "1 4\n2 5\n3 6");
    assert_eq!(run("⍴⍉2 3 4⍴0"), "4 3 2");
    assert_eq!(run("⍉1 2 3"), "1 2 3");
    assert_eq!(run_err("1 0⍉2 2⍴⍳4").kind(), ErrorKind::NotImplemented);
}

#[test]
fn tacks() {
    assert_eq!(run("1 2⊢3 4"), "3 4");
    assert_eq!(run("1 2⊣3 4"), "1 2");
    assert_eq!(run("⊢5"), "5");
    assert_eq!(run("⊣5"), "5");
}

#[test]
fn replicate() {
    assert_eq!(run("1 0 2/1 2 3"), "1 3 3");
    assert_eq!(run("2/1 2"), "1 1 2 2");
    assert_eq!(run("1 ¯2 1/1 2 3"), "1 0 0 3");
    assert_eq!(run("1 0 1/2 3⍴⍳6"), "1 3\n4 6");
    assert_eq!(run("0 1⌿2 3⍴⍳6"), "4 5 6");
    assert_eq!(run_err("1 0/1 2 3").kind(), ErrorKind::Length);
}

#[test]
fn grading() {
    assert_eq!(run("⍋3 1 2"), "2 3 1");
    assert_eq!(run("⍒3 1 2"), "1 3 2");
    assert_eq!(run("⍋1 1 1"), "1 2 3");
    assert_eq!(run("⍋3 2⍴3 1 1 2 1 1"), "3 2 1");
    assert_eq!(run("⍋'cab'"), "2 3 1");
    assert_eq!(run_err("⍋5").kind(), ErrorKind::Rank);
    assert_eq!(run_err("⍋(1 2)(3 4)").kind(), ErrorKind::Domain);
}

#[test]
fn set_functions() {
    assert_eq!(run("∪1 2 1 3 2"), "1 2 3");
    assert_eq!(run("1 2∪2 3"), "1 2 3");
    assert_eq!(run("1 2 3 4∩2 4 6"), "2 4");
    assert_eq!(run("1 2 3 4~2 4"), "1 3");
    assert_eq!(run("'hello'~'l'"), "heo");
    assert_eq!(run_err("∪2 2⍴⍳4").kind(), ErrorKind::Rank);
}

#[test]
fn partitioned_enclose() {
    assert_eq!(run("⍴0 0 0 0⊂1 2 3 4"), "0");
    assert_eq!(run("≢1 1 1 1⊂1 2 3 4"), "4");
    assert_eq!(run("1 1 1 1⊂1 2 3 4"), "┌─┬─┬─┬─┐\n│1│2│3│4│\n└─┴─┴─┴─┘");
    assert_eq!(run("1 0 1 0⊂1 2 3 4"), "┌───┬───┐\n│1 2│3 4│\n└───┴───┘");
    assert_eq!(run("0 0 1 0 1 0⊂1 2 3 4"), "┌───┬───┐\n│1 2│3 4│\n└───┴───┘");
    assert_eq!(run("0 1 0 0⊂1 2 3 4"), "2 3 4");
    assert_eq!(run_err("1 0 1 0 1⊂1 2 3 4").kind(), ErrorKind::Length);
    assert_eq!(run_err("2 0 0 0⊂1 2 3 4").kind(), ErrorKind::Domain);
}

#[test]
fn enclose_and_first() {
    assert_eq!(run("⍴⊂1 2 3"), "");
    assert_eq!(run("≡⊂1 2 3"), "2");
    assert_eq!(run("⊂5"), "5");
    assert_eq!(run("⊃(1 2)(3 4)"), "1 2");
    assert_eq!(run("⊃⍳0"), "0");
    assert_eq!(run("2⊃(1 2)(3 4)"), "3 4");
    assert_eq!(run("2 1⊃(1 2)(3 4)"), "3");
    assert_eq!(run_err("3⊃(1 2)(3 4)").kind(), ErrorKind::Domain);
}

#[test]
fn depth_match_and_tally() {
    assert_eq!(run("≡5"), "0");
    assert_eq!(run("≡1 2"), "1");
    assert_eq!(run("≡(1 2)(3 (4 5))"), "3");
    assert_eq!(run("1 2 3≡1 2 3"), "1");
    assert_eq!(run("1 2 3≡⍪1 2 3"), "0");
    assert_eq!(run("1 2≢1 2"), "0");
    assert_eq!(run("≢2 3⍴⍳6"), "2");
    assert_eq!(run("≢5"), "1");
}

#[test]
fn enlist_and_membership() {
    assert_eq!(run("∊(1 2)(3 (4 5))"), "1 2 3 4 5");
    assert_eq!(run("2 5∊1 2 3"), "1 0");
    assert_eq!(run("(2 2⍴⍳4)∊2 3"), "0 1\n1 0");
    assert_eq!(run("'a'∊'abc'"), "1");
}

#[test]
fn bracket_indexing() {
    let mut session = session();
    session.immediately_execute("v←10 20 30 ◊ m←3 3⍴⍳9").unwrap();
    assert_eq!(evaluate(&mut session, "v[2]"), "20");
    assert_eq!(evaluate(&mut session, "v[3 1]"), "30 10");
    assert_eq!(evaluate(&mut session, "m[2;3]"), "6");
    assert_eq!(evaluate(&mut session, "m[1;]"), "1 2 3");
    assert_eq!(evaluate(&mut session, "m[;1]"), "1 4 7");
    assert_eq!(evaluate(&mut session, "m[1 3;2 3]"), "2 3\n8 9");
    assert_eq!(evaluate(&mut session, "'abc'[2]"), "b");

    let err = session.immediately_execute("v[4]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    let err = session.immediately_execute("m[1]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rank);

    session.immediately_execute("⎕IO←0").unwrap();
    assert_eq!(evaluate(&mut session, "v[0]"), "10");
}
