use confile::{con, decode_binary, encode_binary, print_text, ConMap, ConOptions, Value};
use serde::Serialize;

#[test]
fn test_con_macro_null() {
    assert_eq!(con!(null), Value::Null);
}

#[test]
fn test_con_macro_booleans() {
    assert_eq!(con!(true), Value::Bool(true));
    assert_eq!(con!(false), Value::Bool(false));
}

#[test]
fn test_con_macro_numbers() {
    assert_eq!(con!(42), Value::Integer(42));
    assert_eq!(con!(3.5), Value::Float(3.5));
    assert_eq!(con!(-123), Value::Integer(-123));
    assert_eq!(con!(u64::MAX), Value::Float(u64::MAX as f64));
}

#[test]
fn test_con_macro_strings() {
    assert_eq!(con!("hello"), Value::String("hello".to_string()));
    assert_eq!(con!(""), Value::String(String::new()));
}

#[test]
fn test_con_macro_empty_containers() {
    assert_eq!(con!([]), Value::Array(vec![]));
    assert_eq!(con!({}), Value::Object(ConMap::new()));
}

#[test]
fn test_con_macro_trailing_commas() {
    assert_eq!(con!([1, {"k": 2},]), con!([1, {"k": 2}]));
    assert_eq!(con!({"a": 1,}), con!({"a": 1}));
}

#[test]
fn test_con_macro_mixed_array() {
    let value = con!([1, "two", null, [true], {"k": 2.5}]);
    assert_eq!(
        print_text(&value),
        r#"[1, "two", null, [true], {"k": 2.5}]"#
    );
}

#[test]
fn test_con_macro_object_is_sorted() {
    let value = con!({
        "zebra": 1,
        "apple": 2,
        "mango": 3
    });
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["apple", "mango", "zebra"]);
}

#[derive(Serialize)]
struct Config {
    retries: u8,
    hosts: Vec<&'static str>,
}

#[test]
fn test_con_macro_with_serializable_expression() {
    let config = Config {
        retries: 3,
        hosts: vec!["a", "b"],
    };
    let value = con!({"config": config, "enabled": true});
    assert_eq!(
        print_text(&value),
        r#"{"config": {"hosts": ["a", "b"], "retries": 3}, "enabled": true}"#
    );
}

#[test]
fn test_con_macro_binary_roundtrip() {
    let value = con!({
        "name": "sensor",
        "values": [1, 2, 3],
        "meta": {"unit": "C", "scale": 0.25}
    });
    let bytes = encode_binary(&value, &ConOptions::default()).unwrap();
    assert_eq!(decode_binary(&bytes).unwrap(), value);
}
