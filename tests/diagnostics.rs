mod common;
use common::*;

#[test]
fn missing_paren_points_at_closing_brace() {
    let err = compile_err("fn main() {\n  println(\"x\"\n}\n");
    assert_eq!(err, "test.gnash:3:1: Expected RParen, got RBrace\n}\n^");
}

#[test]
fn nested_function_is_rejected() {
    let err = compile_err("fn main() {\n  fn inner() {}\n}\n");
    assert!(err.starts_with("test.gnash:2:3: functions may only be declared at top level"));
}

#[test]
fn unterminated_string_underlines_to_end() {
    let err = compile_err("x = \"abc");
    assert_eq!(err, "test.gnash:1:5: unterminated string literal\nx = \"abc\n    ^~~~");
}

#[test]
fn stray_character() {
    let err = compile_err("fn main() {\n  a = 1 ^ 2\n}\n");
    assert!(err.starts_with("test.gnash:2:9: unexpected character '^'"));
}
