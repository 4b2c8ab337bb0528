//! End-to-end interpreter tests: source in, captured stdout out.
//!
//! Expectations follow the reference behavior corpus; the trailing newline
//! is stripped before comparison, so an empty expectation means "no output
//! or a single suppressed value".

use pretty_assertions::assert_eq;
use pyth::interpret;

fn assert_pyth(source: &str, expected: &str) {
    let (output, error) = interpret(source.as_bytes(), "");
    if let Some(error) = error {
        panic!("error running {source:?}: {error}\npartial output: {output:?}");
    }
    let trimmed = output.strip_suffix('\n').unwrap_or(&output);
    assert_eq!(expected, trimmed, "source: {source:?}");
}

// === Literals, spacing and closing ===

#[test]
fn blank_suppresses_autoprint() {
    assert_pyth(" 1", "");
    assert_pyth(" \"test\"", "");
    assert_pyth(",1 2", "[1, 2]");
}

#[test]
fn newline_separates_numeric_tokens() {
    assert_pyth("1\n2", "1\n2");
}

#[test]
fn string_literals() {
    assert_pyth("\"\"", "");
    assert_pyth("\"test\"", "test");
    assert_pyth("\"ye", "ye");
}

#[test]
fn one_character_strings() {
    assert_pyth("\\a", "a");
    assert_pyth("\\\\", "\\");
}

#[test]
fn close_one_level() {
    assert_pyth("[5)10", "[5]\n10");
    assert_pyth("[[5)10", "[[5], 10]");
}

#[test]
fn close_all_levels() {
    assert_pyth("[[5;10", "[[5]]\n10");
    assert_pyth("-+10;5", "-10\n5");
}

#[test]
fn binary_strings() {
    assert_pyth(".\"\"", "[]");
    assert_pyth(".\" \"", "[32]");
    assert_pyth(".\"test\"", "[116, 101, 115, 116]");
}

// === Logic: ! & | ? ===

#[test]
fn not_operator() {
    assert_pyth("!0", "1");
    assert_pyth("!]", "1");
    assert_pyth("!\"\"", "1");
    assert_pyth("!42", "0");
    assert_pyth("!]]", "0");
    assert_pyth("!\"foo\"", "0");
}

#[test]
fn and_short_circuits() {
    assert_pyth("&1 2", "2");
    assert_pyth("&0 3", "0");
    assert_pyth("&])\"foo\"", "[]");
    assert_pyth("&\"\"p\"noeval", "");
}

#[test]
fn or_short_circuits() {
    assert_pyth("|3\"test\"", "3");
    assert_pyth("|0\"foobar\"", "foobar");
    assert_pyth("|1p\"noeval\"", "1");
}

#[test]
fn ternary_evaluates_one_branch() {
    assert_pyth("?])2 3", "3");
    assert_pyth("?0\"test\"\"foo\"", "foo");
    assert_pyth("?\"test\"1 3", "1");
    assert_pyth("?0p\"noeval\"\"yay\"", "yay");
}

// === List construction: [ ] , ===

#[test]
fn list_literal() {
    assert_pyth("[", "[]");
    assert_pyth("[0", "[0]");
    assert_pyth("[\"foo\"\"bar\")[10 20", "['foo', 'bar']\n[10, 20]");
}

#[test]
fn one_list() {
    assert_pyth("]5", "[5]");
    assert_pyth("]]]\"test\"", "[[['test']]]");
    assert_pyth("]", "[]");
    assert_pyth("]]", "[[]]");
}

#[test]
fn pair() {
    assert_pyth(",", "[]");
    assert_pyth(",42", "[42]");
    assert_pyth(",\"foo\"\"bar\"", "['foo', 'bar']");
    assert_pyth(",,42 5", "[[42, 5]]");
}

// === Arithmetic: _ + - * ^ ===

#[test]
fn neg_and_reverse() {
    assert_pyth("_5", "-5");
    assert_pyth("__42", "42");
    assert_pyth("_\"foobar", "raboof");
    assert_pyth("__\"ni", "ni");
    assert_pyth("_,2 3", "[3, 2]");
}

#[test]
fn plus() {
    assert_pyth("+3 5", "8");
    assert_pyth("++\"hello\"\", \"\"world\"", "hello, world");
    assert_pyth("+\"the answer is \"42", "the answer is 42");
    assert_pyth("+99\" bottles\"", "99 bottles");
    assert_pyth("+\"test\"[42 10 5", "['test', 42, 10, 5]");
    assert_pyth("+[3 2 1)\"go\"", "[3, 2, 1, 'go']");
    assert_pyth("+[3 2 1)]]\"go", "[3, 2, 1, ['go']]");
    assert_pyth("+_42)", "42");
    assert_pyth("+10", "10");
    assert_pyth("+)", "inf");
}

#[test]
fn minus() {
    assert_pyth("-10 5", "5");
    assert_pyth("-10)", "-10");
    assert_pyth("-_42", "-42");
    assert_pyth("-)", "-inf");
    assert_pyth("-10[3 6 1)", "[0, 2, 4, 5, 7, 8, 9]");
    assert_pyth("-_7[3 \"test\" _2)", "[-7, -6, -5, -4, -3, -1]");
    assert_pyth("-[\"test\" 42 5)5", "['test', 42]");
    assert_pyth("-[0 \"bar\" 1 \"foo\" 2)\"foo\"", "[0, 'bar', 1, 2]");
    assert_pyth("-[0 1 2 3)[2 \"foo\" 3)", "[0, 1]");
    assert_pyth("-[\"foo\" \"test\" 24 3),24\"test\"", "['foo', 3]");
    assert_pyth("-\"1250821084802134\"1", "2508208480234");
    assert_pyth("-`\"101015\"101", "'015'");
    assert_pyth("-42\"2\"", "4");
    assert_pyth("-\"8805808\"80", "858");
    assert_pyth("-\"testest\"\"test\"", "est");
    assert_pyth("-\"nininini\"\"ni\"", "");
    assert_pyth("-\"nfooninibaro\"[\"ni\"\"foobar\")", "no");
}

#[test]
fn times() {
    assert_pyth("*3 5", "15");
    assert_pyth("*3\"ni\"", "ninini");
    assert_pyth("*.\" \"5", "[32, 32, 32, 32, 32]");
    assert_pyth("*[10 20)[40 10)", "[[10, 40], [10, 10], [20, 40], [20, 10]]");
    assert_pyth(
        "*\"foo\"\"bar\"",
        "['fb', 'fa', 'fr', 'ob', 'oa', 'or', 'ob', 'oa', 'or']",
    );
}

#[test]
fn power() {
    assert_pyth("^.04 .5", "0.2");
    assert_pyth("^50 0", "1");
    assert_pyth(
        "^\"bar\"2",
        "['bb', 'ba', 'br', 'ab', 'aa', 'ar', 'rb', 'ra', 'rr']",
    );
    assert_pyth(
        "^U2 3",
        "[[0, 0, 0], [0, 0, 1], [0, 1, 0], [0, 1, 1], [1, 0, 0], [1, 0, 1], [1, 1, 0], [1, 1, 1]]",
    );
}

// === Comparisons and membership: < > q n } ===

#[test]
fn less_than() {
    assert_pyth("<5 10", "1");
    assert_pyth("<5 5", "0");
    assert_pyth("<-)0", "1");
    assert_pyth("<0+)", "1");
    assert_pyth("<-)+)", "1");
    assert_pyth("<+)-)", "0");
    assert_pyth("<[1 2)[3 1)", "1");
    assert_pyth("<[3 1)[1 2)", "0");
    assert_pyth("<\"nini\"3", "nin");
    assert_pyth("<\"foobar\"0", "");
    assert_pyth("<3\"nini\"", "n");
}

#[test]
fn greater_than() {
    assert_pyth(">5 10", "0");
    assert_pyth(">5 5", "0");
    assert_pyth(">-)0", "0");
    assert_pyth(">0+)", "0");
    assert_pyth(">-)+)", "0");
    assert_pyth(">+)-)", "1");
    assert_pyth(">[1 2)[3 1)", "0");
    assert_pyth(">[3 1)[1 2)", "1");
    assert_pyth(">\"nini\"1", "ini");
    assert_pyth(">\"foobar\"_2", "ar");
    assert_pyth(">2\"foobar\"", "ar");
}

#[test]
fn equals_and_not_equals() {
    assert_pyth("q2 5", "0");
    assert_pyth("q3 3", "1");
    assert_pyth("q0 0", "1");
    assert_pyth("q\"foo\"+\\f\"oo\"", "1");
    assert_pyth("q\"foo\"\"bar\"", "0");
    assert_pyth("q,2\"a\"[2\"a\"", "1");
    assert_pyth("q[)]3", "0");
    assert_pyth("n00", "0");
    assert_pyth("n01", "1");
    assert_pyth("n\"1\"1", "1");
}

#[test]
fn membership() {
    assert_pyth("}5 .15", "1");
    assert_pyth("}3 42", "0");
    assert_pyth("}20\"120\"", "1");
    assert_pyth("}23\"32\"", "0");
    assert_pyth("}\"test\"[\"testing\"\"bar\"", "0");
    assert_pyth("}\"test\"[\"foo\"\"test\"", "1");
    assert_pyth("}3U4", "1");
    assert_pyth("}4U4", "0");
    assert_pyth("},1 2[,0 1,1 2,3 4", "1");
    assert_pyth("}[1)U4", "0");
}

// === Repr ===

#[test]
fn repr() {
    assert_pyth("`5", "5");
    assert_pyth("`\"foo\"", "'foo'");
    assert_pyth("`[5 [3\"test\"", "[5, [3, 'test']]");
}

// === Assignment: = ~ and auto-init x y ===

#[test]
fn assign() {
    assert_pyth("=a5a", "5");
    assert_pyth("z+3=z5z", "0\n8\n5");
    assert_pyth("=+z5z", "5");
    assert_pyth("=z5=.!zz", "120");
}

#[test]
fn post_assign() {
    assert_pyth("+2~+z3z", "2\n3");
    assert_pyth("~+z10", "");
}

#[test]
fn auto_assign() {
    assert_pyth("+x5xx", "10\n5");
    assert_pyth("*y10+y3y", "130\n10");
    assert_pyth("x3", "");
    assert_pyth("y10", "");
}

// === Variable presets ===

#[test]
fn presets() {
    assert_pyth("a", "abcdefghijklmnopqrstuvwxyz");
    assert_pyth("=a5a", "5");
    assert_pyth("42b5", "42\n\n\n5");
    assert_pyth("+c\"foo", " foo");
    assert_pyth("=c5c", "5");
    assert_pyth("s[\"foo\"d\"bar\"", "foobar");
    assert_pyth("ld", "0");
    assert_pyth("e", "10");
    assert_pyth("=e*e2e", "20");
    assert_pyth("w", "[]");
    assert_pyth("=w5w", "5");
    assert_pyth("z", "0");
    assert_pyth("+z2", "2");
    assert_pyth("z\"test\"", "0\ntest");
}

#[test]
fn dollar_presets() {
    assert_pyth("=a5$a", "abcdefghijklmnopqrstuvwxyz");
    assert_pyth("=$a5$a", "5");
    assert_pyth("$A", "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    assert_pyth("$q", "qwertyuiopasdfghjklzxcvbnm");
    assert_pyth("=$q5$q", "5");
    assert_pyth("$Q", "QWERTYUIOPASDFGHJKLZXCVBNM");
    assert_pyth("=$Q5$Q", "5");
}

// === Sequence-or-number operators: h t H T l s U S { ===

#[test]
fn head() {
    assert_pyth("h0", "1");
    assert_pyth("h\"test\"", "t");
    assert_pyth("h[2 3 4", "2");
}

#[test]
fn tail() {
    assert_pyth("t0", "-1");
    assert_pyth("t\"test\"", "est");
    assert_pyth("t[1 4 9)", "[4, 9]");
}

#[test]
fn end() {
    assert_pyth("H[0 1 2)", "2");
    assert_pyth("H\"abcd\"", "d");
}

#[test]
fn pop() {
    assert_pyth("T[0 1 2)", "[0, 1]");
    assert_pyth("T\"test\"", "tes");
    assert_pyth("T13", "3");
    assert_pyth("T19.3", "9.3");
}

#[test]
fn len() {
    assert_pyth("l1", "0");
    assert_pyth("l\"abd\"", "3");
    assert_pyth("l\"", "0");
    assert_pyth("l[1 2 3", "3");
}

#[test]
fn sum() {
    assert_pyth("s.5", "0");
    assert_pyth("s_.5", "-1");
    assert_pyth("s1", "1");
    assert_pyth("s\"1.5\"", "1.5");
    assert_pyth("s\"01\"", "1");
    assert_pyth("sU5", "10");
    assert_pyth("s[\"foo\"\"bar\"\"ni\"\"spam\")", "foobarnispam");
    assert_pyth("s[\"foo\"0\"bar\"1)", "foo0bar1");
    assert_pyth("s[", "0");
}

#[test]
fn unary_range() {
    assert_pyth("U[5 1 3", "[0, 1, 2]");
    assert_pyth("U4", "[0, 1, 2, 3]");
    assert_pyth("U_4", "[-4, -3, -2, -1]");
}

#[test]
fn sorted() {
    assert_pyth("S5", "[1, 2, 3, 4, 5]");
    assert_pyth("S_3", "[-2, -1, 0]");
    assert_pyth("S\"test\"", "estt");
    assert_pyth("S[1 5 2 0 9", "[0, 1, 2, 5, 9]");
    assert_pyth("S[\"foo\"\"bar\"", "['bar', 'foo']");
}

#[test]
fn unique() {
    assert_pyth("{\"aabca\"", "abc");
    assert_pyth("{[1 2 1 3 2)", "[1, 2, 3]");
    assert_pyth("{5", "[5]");
}

// === Print ===

#[test]
fn print_operator() {
    assert_pyth("p10", "10");
    assert_pyth("p]10", "[10]");
    assert_pyth("p\"test\"", "test");
    assert_pyth("p10\"test\"", "10test");
    assert_pyth("p\"foo\"\"bar\"", "foobar");
    assert_pyth("p\"pier \"10", "pier 10");
    assert_pyth("p\"no \"\"newline,\"\"please", "no newline,\nplease");
    assert_pyth("+5p3", "38");
}

// === Map, filter, order-by ===

#[test]
fn map() {
    assert_pyth("m[1 2)a", "[1, 2]");
    assert_pyth("m5a", "[0, 1, 2, 3, 4]");
    assert_pyth("m5mab", "[[], [0], [0, 1], [0, 1, 2], [0, 1, 2, 3]]");
    assert_pyth("m3am3a", "[0, 1, 2]\n[0, 1, 2]");
}

#[test]
fn filter() {
    assert_pyth("fU10<a5", "[0, 1, 2, 3, 4]");
    assert_pyth("fq.!a120", "5");
    assert_pyth("f2!-ae", "10");
}

#[test]
fn order_by() {
    assert_pyth("o[\"cc\"\"b\"\"aaa\")la", "['b', 'cc', 'aaa']");
}

// === Lambda ===

#[test]
fn lambda() {
    assert_pyth("L*5a2L50", "10\n250");
    assert_pyth("L0", "");
    assert_pyth("L|<a1*aLta5", "120");
    assert_pyth("L0)L\"test\"", "0");
    assert_pyth("+L+2*3a5L10L30", "49\n92");
}

// === Blocks: F I E # B ===

#[test]
fn for_loops() {
    assert_pyth("F10)", "");
    assert_pyth("F[1 42 30 3)+a5a)10", "6\n1\n47\n42\n35\n30\n8\n3\n10");
    assert_pyth("F\"test\"+\"ni\"a", "nit\nnie\nnis\nnit");
    assert_pyth("F5^a3", "0\n1\n8\n27\n64");
    assert_pyth("F2F3,ab", "[0, 0]\n[0, 1]\n[0, 2]\n[1, 0]\n[1, 1]\n[1, 2]");
}

#[test]
fn for_with_explicit_variable() {
    assert_pyth("FZ[1 2)ZB", "1");
}

#[test]
fn break_out_of_loops() {
    assert_pyth("F[1 2)aB", "1");
    assert_pyth("F\"test\"F\"12\"+abB", "t1\ne1\ns1\nt1");
    assert_pyth("F\"test\"F\"12\"+ab)B", "t1\nt2");
}

#[test]
fn if_blocks() {
    assert_pyth("I0p8 10)5", "5");
    assert_pyth("I8p3)5", "35");
}

#[test]
fn else_blocks() {
    assert_pyth("I0p8 10E5", "5");
    assert_pyth("I8p3E5", "3");
    assert_pyth("F9Iqa5BE1", "");
    assert_pyth("F4Iqa5BE1", "1");
}

#[test]
fn loop_else_at_root() {
    // A broken loop skips its else branch; a completed one runs it.
    assert_pyth("F[1 2)aBE5", "1");
    assert_pyth("F2aE5", "0\n1\n5");
}

#[test]
fn forever_swallows_errors() {
    assert_pyth("#1B", "1");
    assert_pyth("#1hw)2", "1\n2");
}

// === Dotted operators: .! .< .> ===

#[test]
fn factorial() {
    assert_pyth(".!5", "120");
    assert_pyth(".!0", "1");
    assert_pyth(".!.5", "0.88622692545275801365");
}

#[test]
fn leftshift() {
    assert_pyth(".<3 3", "24");
    assert_pyth(".<0 10", "0");
    assert_pyth(".<1 8", "256");
    assert_pyth(".<\"foobar\"2", "obarfo");
    assert_pyth(".<U10 3", "[3, 4, 5, 6, 7, 8, 9, 0, 1, 2]");
}

#[test]
fn rightshift() {
    assert_pyth(".>24 3", "3");
    assert_pyth(".>0 10", "0");
    assert_pyth(".>256 8", "1");
    assert_pyth(".>7 1", "3");
    assert_pyth(".>\"foobar\"2", "arfoob");
    assert_pyth(".>U10 3", "[7, 8, 9, 0, 1, 2, 3, 4, 5, 6]");
}

// === Comments and meta-commands ===

#[test]
fn comments_and_end_meta() {
    assert_pyth("1 ; a comment\n2", "1\n2");
    assert_pyth("1\n;#end\n2", "1");
}

// === Cross-cutting properties ===

#[test]
fn equality_inequality_duality() {
    // For any pair, `q a b` + `n a b` is 1.
    for (a, b) in [("0", "0"), ("0", "1"), ("\"x\"", "\"x\""), ("\"1\"", "1"), ("[1)", "[1)")] {
        let (q_out, q_err) = interpret(format!("q{a} {b}").as_bytes(), "");
        let (n_out, n_err) = interpret(format!("n{a} {b}").as_bytes(), "");
        assert!(q_err.is_none() && n_err.is_none());
        let total: i32 = q_out.trim().parse::<i32>().unwrap() + n_out.trim().parse::<i32>().unwrap();
        assert_eq!(total, 1, "duality for {a} {b}");
    }
}

#[test]
fn makeiter_contract() {
    assert_pyth("U0", "[]");
    assert_pyth("U3", "[0, 1, 2]");
    assert_pyth("U_3", "[-3, -2, -1]");
}
