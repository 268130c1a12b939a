use lenient_uri::pct_enc::{
    decode, encode, encode_byte,
    table::{self, Table},
};
use std::borrow::Cow;

#[test]
fn encode_with_table() {
    assert!(matches!(encode("", table::QUERY_SET), Cow::Borrowed("")));
    assert!(matches!(encode("a=1&b", table::QUERY_SET), Cow::Borrowed(_)));

    assert_eq!(encode("a b<c>", table::QUERY_SET), "a%20b%3Cc%3E");
    assert_eq!(encode("a b", table::C0_CONTROL_SET), "a b");
    assert_eq!(encode("\t\x7f", table::C0_CONTROL_SET), "%09%7F");
    assert_eq!(encode("a/b?c", table::PATH_SET), "a/b%3Fc");
    assert_eq!(encode("a/b@c", table::USERINFO_SET), "a%2Fb%40c");
    assert_eq!(encode("1+1=2&3%", table::COMPONENT_SET), "1%2B1%3D2%263%25");
    assert_eq!(encode("it's", table::SPECIAL_QUERY_SET), "it%27s");
    assert_eq!(encode("`x`", table::FRAGMENT_SET), "%60x%60");

    // Non-ASCII bytes are always encoded.
    assert_eq!(encode("é", Table::range(0, 0x7f)), "%C3%A9");
    assert_eq!(encode("张三", table::C0_CONTROL_SET), "%E5%BC%A0%E4%B8%89");

    let custom = table::ALPHA.or(Table::new(b"-"));
    assert_eq!(encode("ab-c1", custom), "ab-c%31");
}

#[test]
fn decode_valid() {
    assert!(matches!(decode("plain"), Cow::Borrowed("plain")));
    assert_eq!(decode("%41%62c"), "Abc");
    assert_eq!(decode("%e5%bc%a0%E4%B8%89"), "张三");
    assert_eq!(decode("%C3%A9t%C3%A9"), "été");
    assert_eq!(decode("%F0%9F%98%80"), "😀");
    assert_eq!(decode("%25%2541"), "%%41");
}

#[test]
fn decode_invalid_passes_through() {
    // Not hexadecimal.
    assert_eq!(decode("%zz%4"), "%zz%4");
    assert_eq!(decode("%"), "%");
    // Missing or bad continuation bytes.
    assert_eq!(decode("%C3"), "%C3");
    assert_eq!(decode("%C3%28"), "%C3(");
    assert_eq!(decode("%E4%B8"), "%E4%B8");
    // Stray continuation byte and invalid leading bytes.
    assert_eq!(decode("%80a"), "%80a");
    assert_eq!(decode("%FF%C0%AF"), "%FF%C0%AF");
    // Untouched text keeps its original characters.
    assert_eq!(decode("张%20三"), "张 三");
}

#[test]
fn round_trip() {
    for s in [
        "",
        "hello world",
        "100% sure & then some",
        "name=张三&emoji=😀",
        "\u{0}\u{1f}\u{7f}",
    ] {
        let encoded = encode(s, table::COMPONENT_SET);
        assert!(encoded.is_ascii());
        assert_eq!(decode(&encoded), s);
    }
}

#[test]
fn single_bytes() {
    assert_eq!(encode_byte(0), "%00");
    assert_eq!(encode_byte(b'%'), "%25");
    assert_eq!(encode_byte(0xab), "%AB");
    assert_eq!(encode_byte(0xff), "%FF");
}
