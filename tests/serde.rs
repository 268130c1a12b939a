#![cfg(feature = "serde")]

use lenient_uri::{SearchParams, Uri};

#[test]
fn uri() {
    let uri = Uri::parse("http://user@example.com:8080/a/../b?q=1#f").unwrap();
    let json = serde_json::to_string(&uri).unwrap();
    assert_eq!(json, r#""http://user@example.com:8080/a/../b?q=1#f""#);

    let borrowed: Uri<&str> = serde_json::from_str(&json).unwrap();
    assert_eq!(borrowed, uri);
    let owned: Uri<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(owned.port(), Some(8080));

    let err = serde_json::from_str::<Uri<String>>(r##""#frag""##).unwrap_err();
    assert!(err
        .to_string()
        .starts_with(r##"failed to parse "#frag" as URI: fragment delimiter cannot be first character"##));
}

#[test]
fn search_params() {
    let params: SearchParams = serde_json::from_str(r#""a=1&b=x+y""#).unwrap();
    assert_eq!(params.get("b"), Some("x y"));
    assert_eq!(serde_json::to_string(&params).unwrap(), r#""a=1&b=x+y""#);
}
