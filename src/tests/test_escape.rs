use crate::*;
use rstest::*;

fn escape(s: &[u8]) -> String {
    let mut buf = Vec::new();
    append_json_bytes(&mut buf, s);
    String::from_utf8(buf).unwrap()
}

#[rstest]
#[case(b"", r#""""#)]
#[case(b"hello world", r#""hello world""#)]
#[case(b"say \"hi\"", r#""say \"hi\"""#)]
#[case(b"C:\\dir", r#""C:\\dir""#)]
#[case(b"a\nb\tc\rd", r#""a\nb\tc\rd""#)]
#[case(b"\x08\x0c", r#""\b\f""#)]
#[case(b"\x01\x1f\x7f", r#""\u0001\u001f\u007f""#)]
#[case("中文 ok".as_bytes(), "\"中文 ok\"")]
#[case(b"ab\xffcd", r#""ab\ufffdcd""#)]
#[case(b"\xe4\xb8", r#""\ufffd""#)]
fn test_escape(#[case] input: &[u8], #[case] expected: &str) {
    assert_eq!(escape(input), expected);
}

#[rstest]
#[case("")]
#[case("plain ascii")]
#[case("quote \" and backslash \\")]
#[case("controls \u{0} \u{7} \u{1b} \n")]
#[case("unicode é 中 🚀")]
fn test_escape_parse_back(#[case] input: &str) {
    let mut buf = Vec::new();
    append_json_str(&mut buf, input);
    let parsed: String = serde_json::from_slice(&buf).unwrap();
    assert_eq!(parsed, input);
}

#[test]
fn test_escape_invalid_utf8_parse_back() {
    let input = b"ok\xc3\x28end\xff";
    let parsed: String = serde_json::from_str(&escape(input)).unwrap();
    assert_eq!(parsed, String::from_utf8_lossy(input));
}

#[test]
fn test_escape_appends() {
    let mut buf = b"prefix:".to_vec();
    append_json_str(&mut buf, "v");
    assert_eq!(buf, b"prefix:\"v\"");
}
