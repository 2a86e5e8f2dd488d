pub mod common;

use common::*;

fn test_zero_length_matches_tc(tc: TestConfig) {
    tc.compile(".*?").match_all("a").test_eq(vec!["", ""]);
    tc.compile(".*?")
        .match_all("\u{0251}")
        .test_eq(vec!["", ""]);
}

#[test]
fn test_zero_length_matches() {
    test_with_configs(test_zero_length_matches_tc)
}

fn non_matching_captures_tc(tc: TestConfig) {
    let m = tc
        .compile("aa(b)?aa")
        .indices("aaaa")
        .expect("should have matched");
    assert_eq!(m, vec![0, 4, -1, -1]);
}

#[test]
fn non_matching_captures() {
    test_with_configs(non_matching_captures_tc)
}

fn test_multiline_tc(tc: TestConfig) {
    tc.compile(r"^abc").match1("abc").test_eq("abc");
    tc.compile(r"^def").test_fails("abc\ndef");
    tc.compile(r"(?m)^def").match1("abc\ndef").test_eq("def");
    tc.compile(r"[ab]$").match1("a\nb").test_eq("b");
    tc.compile(r"(?m)[ab]$").match1("a\nb").test_eq("a");
    tc.compile(r"(?m)^\d")
        .match_all("aaa\n789\nccc\n345")
        .test_eq(vec!["7", "3"]);
    tc.compile(r"(?m)\d$")
        .match_all("aaa789\n789\nccc10\n345")
        .test_eq(vec!["9", "9", "0", "5"]);
    // \A and \z ignore multiline.
    tc.compile(r"(?m)\Adef").test_fails("abc\ndef");
    tc.compile(r"(?m)abc\z").test_fails("abc\ndef");
    tc.compile(r"(?m)def\z").match1("abc\ndef").test_eq("def");
}

#[test]
fn test_multiline() {
    test_with_configs(test_multiline_tc)
}

fn test_greedy_reluctant_tc(tc: TestConfig) {
    assert_eq!(tc.compile("a*").indices("aaa"), Some(vec![0, 3]));
    assert_eq!(tc.compile("a*?").indices("aaa"), Some(vec![0, 0]));
    assert_eq!(tc.compile("a+?").indices("aaa"), Some(vec![0, 1]));
    assert_eq!(tc.compile("a{1,3}?b").indices("aaab"), Some(vec![0, 4]));
    // The U flag swaps the defaults.
    assert_eq!(tc.compile("(?U)a+").indices("aaa"), Some(vec![0, 1]));
    assert_eq!(tc.compile("(?U)a+?").indices("aaa"), Some(vec![0, 3]));
}

#[test]
fn test_greedy_reluctant() {
    test_with_configs(test_greedy_reluctant_tc)
}

fn test_backtracking_spans_tc(tc: TestConfig) {
    assert_eq!(
        tc.compile("(.*)(.*)").indices("abc"),
        Some(vec![0, 3, 0, 3, 3, 3])
    );
    assert_eq!(
        tc.compile("(.*?)(.*)").indices("abc"),
        Some(vec![0, 3, 0, 0, 0, 3])
    );
}

#[test]
fn test_backtracking_spans() {
    test_with_configs(test_backtracking_spans_tc)
}

#[test]
fn test_backtracking_spans_longest() {
    // Greediness makes the longest-mode answer identical here.
    test_with_configs(|tc| {
        assert_eq!(
            tc.compile("(.*)(.*)").longest().indices("abc"),
            Some(vec![0, 3, 0, 3, 3, 3])
        );
    });
}

fn test_alternation_tc(tc: TestConfig) {
    // First branch wins by default.
    assert_eq!(tc.compile("a|ab").indices("ab"), Some(vec![0, 1]));
    assert_eq!(tc.compile("ab|a").indices("ab"), Some(vec![0, 2]));
    // An empty branch matches the empty string.
    assert_eq!(tc.compile("x|").indices("y"), Some(vec![0, 0]));
    tc.compile("(cat|dog|bird)")
        .match_all("a cat, a dog and a bird")
        .test_eq(vec!["cat", "dog", "bird"]);
}

#[test]
fn test_alternation() {
    test_with_configs(test_alternation_tc)
}

#[test]
fn test_longest_mode() {
    test_with_configs(|tc| {
        assert_eq!(tc.compile("a|ab").longest().indices("ab"), Some(vec![0, 2]));
        assert_eq!(
            tc.compile("a+?").longest().indices("aaa"),
            Some(vec![0, 3])
        );
    });
}

fn test_classes_tc(tc: TestConfig) {
    tc.compile("[0-9]+").match1("abc123def").test_eq("123");
    tc.compile("[^a-z]+").match1("abc123def").test_eq("123");
    tc.compile("[a-c-]+").match1("a-b-cd").test_eq("a-b-c");
    tc.compile(r"[\d]+").match1("x42y").test_eq("42");
    tc.compile(r"[\w.]+").match1("a.b@c").test_eq("a.b");
    tc.compile(r"\D+").match1("12ab34").test_eq("ab");
    tc.compile(r"[^\d]+").match1("12ab34").test_eq("ab");
    tc.compile(r"[[:alpha:]]+").match1("12ab34").test_eq("ab");
    tc.compile(r"[[:^digit:]]+").match1("12ab34").test_eq("ab");
    tc.compile(r"[[:xdigit:]]+").match1("zz1fzz").test_eq("1f");
    tc.compile(r"\s\w+").match1("a bc d").test_eq(" bc");
    // \b inside a class is a backspace.
    tc.compile(r"[\b]").match1("a\u{8}b").test_eq("\u{8}");
}

#[test]
fn test_classes() {
    test_with_configs(test_classes_tc)
}

fn test_case_folding_tc(tc: TestConfig) {
    tc.compile("(?i)hello").match1("say HeLLo!").test_eq("HeLLo");
    tc.compile("(?i)[a-z]+").match1("ABC").test_eq("ABC");
    tc.compile("(?i:a)b").match1("Ab").test_eq("Ab");
    tc.compile("(?i:a)b").test_fails("AB");
    tc.compile("(?i)σ").match1("Σ").test_eq("Σ");
}

#[test]
fn test_case_folding() {
    test_with_configs(test_case_folding_tc)
}

fn test_dot_tc(tc: TestConfig) {
    tc.compile("a.c").match1("abc").test_eq("abc");
    tc.compile("a.c").test_fails("a\nc");
    tc.compile("(?s)a.c").match1("a\nc").test_eq("a\nc");
    // Dot consumes a whole rune.
    assert_eq!(tc.compile(".").indices("語x"), Some(vec![0, 3]));
}

#[test]
fn test_dot() {
    test_with_configs(test_dot_tc)
}

fn test_word_boundary_tc(tc: TestConfig) {
    tc.compile(r"\bfoo\b").match1("a foo bar").test_eq("foo");
    tc.compile(r"\bfoo\b").test_fails("foobar");
    tc.compile(r"\bfoo\b").match1("foo").test_eq("foo");
    tc.compile(r"\Bar\B").match1("barb").test_eq("ar");
    tc.compile(r"\Bfoo").test_fails("foo bar");
}

#[test]
fn test_word_boundary() {
    test_with_configs(test_word_boundary_tc)
}

fn test_unicode_tc(tc: TestConfig) {
    tc.compile("[α-ω]+").match1("abc αβγ def").test_eq("αβγ");
    tc.compile(r"\p{Greek}+").match1("abc αβγ def").test_eq("αβγ");
    tc.compile(r"\p{L}+").match1("!?abcαβγ12").test_eq("abcαβγ");
    tc.compile(r"\P{L}+").match1("ab?!cd").test_eq("?!");
    tc.compile("語+").match1("a語語b").test_eq("語語");
}

#[test]
fn test_unicode() {
    test_with_configs(test_unicode_tc)
}

fn test_groups_tc(tc: TestConfig) {
    tc.compile("(a+)(b+)").match1("xaabbby").test_eq("aabbb,aa,bbb");
    tc.compile("((a)(b))").match1("ab").test_eq("ab,ab,a,b");
    // The last iteration of a repeated group wins.
    tc.compile("(a|b)+").match1("abba").test_eq("abba,a");
    tc.compile("(?:ab)+").match1("ababab").test_eq("ababab");
}

#[test]
fn test_groups() {
    test_with_configs(test_groups_tc)
}

fn test_quoted_literal_tc(tc: TestConfig) {
    tc.compile(r"\Qa.b*\E").match1("xa.b*y").test_eq("a.b*");
    tc.compile(r"\Qa.b\E").test_fails("axb");
    // \Q without \E runs to the end of the pattern.
    tc.compile(r"\Q(a)").match1("x(a)y").test_eq("(a)");
}

#[test]
fn test_quoted_literal() {
    test_with_configs(test_quoted_literal_tc)
}

fn test_escapes_tc(tc: TestConfig) {
    tc.compile(r"a\x41b").match1("aAb").test_eq("aAb");
    tc.compile(r"\x{1F600}").match1("x😀y").test_eq("😀");
    tc.compile(r"\t\n").match1("a\t\nb").test_eq("\t\n");
    tc.compile(r"\0").match1("a\0b").test_eq("\0");
    tc.compile(r"\012").match1("a\nb").test_eq("\n");
    tc.compile(r"\.\*\(").match1("a.*(b").test_eq(".*(");
}

#[test]
fn test_escapes() {
    test_with_configs(test_escapes_tc)
}

fn test_find_from_tc(tc: TestConfig) {
    let re = tc.compile("o+");
    assert_eq!(re.re.find_submatch_index(b"foo oo", 0), Some(vec![1, 3]));
    assert_eq!(re.re.find_submatch_index(b"foo oo", 3), Some(vec![4, 6]));
    assert_eq!(re.re.find_submatch_index(b"foo oo", 6), None);
    assert_eq!(re.re.find_submatch_index(b"foo oo", 7), None);
    // ^ anchors to the haystack start, not to the search start.
    let re = tc.compile("^f");
    assert_eq!(re.re.find_submatch_index(b"ff", 1), None);
}

#[test]
fn test_find_from() {
    test_with_configs(test_find_from_tc)
}

fn test_find_all_tc(tc: TestConfig) {
    tc.compile("a+").match_all("aa b aaa ba").test_eq(vec!["aa", "aaa", "a"]);
    let re = tc.compile("a+");
    assert_eq!(re.re.find_all_submatch_index(b"aa b aaa ba", 2).len(), 2);
    assert_eq!(re.re.find_all_submatch_index(b"aa b aaa ba", 0).len(), 0);
    // The empty match at the end of "aa" is suppressed; the one at the
    // end of input is kept.
    tc.compile("a*").match_all("aab").test_eq(vec!["aa", ""]);
}

#[test]
fn test_find_all() {
    test_with_configs(test_find_all_tc)
}

fn test_empty_pattern_tc(tc: TestConfig) {
    assert_eq!(tc.compile("").indices(""), Some(vec![0, 0]));
    assert_eq!(tc.compile("").indices("ab"), Some(vec![0, 0]));
    assert_eq!(tc.compile("x*").indices(""), Some(vec![0, 0]));
}

#[test]
fn test_empty_pattern() {
    test_with_configs(test_empty_pattern_tc)
}

#[test]
fn test_subexp_metadata() {
    let re = retrack::must_compile(r"(a)(?P<mid>b)((?:c)(?'end'd))");
    assert_eq!(re.num_subexp(), 4);
    assert_eq!(re.subexp_names(), vec!["", "", "mid", "", "end"]);
    assert!(!re.is_extended());

    let re = retrack::must_compile(r"(\w)\k{1}");
    assert!(re.is_extended());
    let re = retrack::must_compile(r"(?>a)");
    assert!(re.is_extended());
    let re = retrack::must_compile(r"a*+");
    assert!(re.is_extended());
    let re = retrack::must_compile(r"(?=a)");
    assert!(re.is_extended());
    let re = retrack::must_compile(r"(?{f})");
    assert!(re.is_extended());
}

#[test]
fn test_determinism() {
    test_with_configs(|tc| {
        let re = tc.compile(r"(a+)(a*)(b?)c?");
        let text = "aaabcaab";
        let first = re.re.find_all_submatch_index(text.as_bytes(), -1);
        for _ in 0..3 {
            assert_eq!(re.re.find_all_submatch_index(text.as_bytes(), -1), first);
        }
    });
}

#[test]
fn test_pattern_is_shareable() {
    let re = retrack::must_compile(r"(\w)\k{1}");
    let shared = std::sync::Arc::new(re);
    let mut handles = Vec::new();
    for _ in 0..4 {
        let re = std::sync::Arc::clone(&shared);
        handles.push(std::thread::spawn(move || {
            re.find_submatch_index(b"xyzzy", 0)
        }));
    }
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(vec![2, 4, 2, 3]));
    }
}
