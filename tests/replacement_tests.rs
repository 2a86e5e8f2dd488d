//! Tests for split, replace and template expansion.

pub mod common;

use common::*;

fn test_split_tc(tc: TestConfig) {
    let re = tc.compile(",");
    assert_eq!(
        re.re.split(b"a,b,c", -1),
        vec![&b"a"[..], &b"b"[..], &b"c"[..]]
    );
    assert_eq!(re.re.split(b"a,b,c", 2), vec![&b"a"[..], &b"b,c"[..]]);
    assert_eq!(re.re.split(b"a,b,c", 0), Vec::<&[u8]>::new());
    assert_eq!(re.re.split(b"abc", -1), vec![&b"abc"[..]]);
    // A non-empty pattern against empty text yields one empty piece.
    assert_eq!(re.re.split(b"", -1), vec![&b""[..]]);

    let re = tc.compile("[0-9]+");
    assert_eq!(
        re.re.split(b"ab12cd34ef", -1),
        vec![&b"ab"[..], &b"cd"[..], &b"ef"[..]]
    );

    // An empty-match pattern splits between runes.
    let re = tc.compile("");
    assert_eq!(
        re.re.split(b"abc", -1),
        vec![&b"a"[..], &b"b"[..], &b"c"[..]]
    );
}

#[test]
fn test_split() {
    test_with_configs(test_split_tc)
}

fn test_replace_all_tc(tc: TestConfig) {
    let re = tc.compile("a(x*)b");
    let text = b"-ab-axxb-";
    assert_eq!(re.re.replace_all(text, b"T"), b"-T-T-".to_vec());
    assert_eq!(re.re.replace_all(text, b"$1"), b"--xx-".to_vec());
    // $1W parses as the name "1W", which does not exist.
    assert_eq!(re.re.replace_all(text, b"$1W"), b"---".to_vec());
    assert_eq!(re.re.replace_all(text, b"${1}W"), b"-W-xxW-".to_vec());
    assert_eq!(re.re.replace_all(text, b"$$"), b"-$-$-".to_vec());
}

#[test]
fn test_replace_all() {
    test_with_configs(test_replace_all_tc)
}

fn test_replace_all_literal_tc(tc: TestConfig) {
    let re = tc.compile("a(x*)b");
    let text = b"-ab-axxb-";
    assert_eq!(
        re.re.replace_all_literal(text, b"$1"),
        b"-$1-$1-".to_vec()
    );
    assert_eq!(re.re.replace_all_literal(text, b"X"), b"-X-X-".to_vec());
}

#[test]
fn test_replace_all_literal() {
    test_with_configs(test_replace_all_literal_tc)
}

fn test_named_replacement_tc(tc: TestConfig) {
    let re = tc.compile(r"(?P<first>\w+) (?P<last>\w+)");
    assert_eq!(
        re.re.replace_all(b"ada lovelace", b"$last $first"),
        b"lovelace ada".to_vec()
    );
    assert_eq!(
        re.re.replace_all(b"ada lovelace", b"${last}, ${first}"),
        b"lovelace, ada".to_vec()
    );
}

#[test]
fn test_named_replacement() {
    test_with_configs(test_named_replacement_tc)
}

fn test_expand_tc(tc: TestConfig) {
    let re = tc.compile(r"(?P<key>\w+):(?P<value>\w+)");
    let src = b"opt:on flag:off";
    let mut out = Vec::new();
    for m in re.re.find_all_submatch_index(src, -1) {
        out = re.re.expand(out, b"$key=$value;", src, &m);
    }
    assert_eq!(out, b"opt=on;flag=off;".to_vec());
    // $0 is the whole match.
    let m = re.re.find_submatch_index(src, 0).expect("should match");
    let out = re.re.expand(Vec::new(), b"<$0>", src, &m);
    assert_eq!(out, b"<opt:on>".to_vec());
}

#[test]
fn test_expand() {
    test_with_configs(test_expand_tc)
}

fn test_replace_with_empty_matches_tc(tc: TestConfig) {
    let re = tc.compile("x*");
    assert_eq!(re.re.replace_all(b"axbxc", b"-"), b"-a-b-c-".to_vec());
}

#[test]
fn test_replace_with_empty_matches() {
    test_with_configs(test_replace_with_empty_matches_tc)
}
