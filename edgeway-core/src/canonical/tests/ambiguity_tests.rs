use crate::canonical::is_ambiguous;

#[test]
fn plain_path_is_not_ambiguous() {
    assert!(!is_ambiguous("/dir/file.txt"));
}

#[test]
fn single_encoded_escape_is_not_ambiguous() {
    assert!(!is_ambiguous("/a%20b.txt"));
}

#[test]
fn encoded_escape_is_ambiguous() {
    assert!(is_ambiguous("/a%2520b.txt"));
}

#[test]
fn encoded_escape_with_lowercase_hex_is_ambiguous() {
    assert!(is_ambiguous("/caf%25c3%25a9"));
}

#[test]
fn literal_percent_without_hex_is_not_ambiguous() {
    assert!(!is_ambiguous("/100%25"));
    assert!(!is_ambiguous("/100%25x"));
    assert!(!is_ambiguous("/100%25G1"));
}

#[test]
fn truncated_encoded_escape_is_not_ambiguous() {
    assert!(!is_ambiguous("/a%252"));
}

#[test]
fn ambiguity_spans_whole_path() {
    assert!(is_ambiguous("/plain/dir%252Fsub/file"));
}

#[test]
fn empty_path_is_not_ambiguous() {
    assert!(!is_ambiguous(""));
}
