//! Literal wire fixtures: exact bytes in, exact values or errors out.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_tnetstring::{from_slice, to_vec, Error, Map, Tag, Value};
use std::collections::HashMap;

fn decode_err<T: for<'de> Deserialize<'de> + std::fmt::Debug>(input: &[u8]) -> Error {
    from_slice::<T>(input).unwrap_err()
}

#[test]
fn test_encode_scalars() {
    assert_eq!(to_vec("hello, world").unwrap(), b"12:hello, world,");
    assert_eq!(to_vec("日本語").unwrap(), "9:日本語,".as_bytes());
    assert_eq!(to_vec(&true).unwrap(), b"4:true!");
    assert_eq!(to_vec(&false).unwrap(), b"5:false!");
    assert_eq!(to_vec(&1).unwrap(), b"1:1#");
    assert_eq!(to_vec(&-1).unwrap(), b"2:-1#");
    assert_eq!(to_vec(&1.0).unwrap(), b"8:1.000000^");
    assert_eq!(to_vec(&Value::Null).unwrap(), b"0:~");
}

#[test]
fn test_encode_sequences() {
    assert_eq!(to_vec(&[0u32; 0]).unwrap(), b"0:]");
    assert_eq!(to_vec(&["foo", "bar", "baz"]).unwrap(), b"18:3:foo,3:bar,3:baz,]");
    assert_eq!(to_vec(&Vec::<String>::new()).unwrap(), b"0:]");
    assert_eq!(
        to_vec(&vec!["foo", "bar", "baz"]).unwrap(),
        b"18:3:foo,3:bar,3:baz,]"
    );
    assert_eq!(to_vec(&[b'a', b'b', b'c']).unwrap(), b"3:abc,");
    assert_eq!(to_vec(&b"abc".to_vec()).unwrap(), b"3:abc,");
    assert_eq!(to_vec(&Value::Bytes(vec![])).unwrap(), b"0:,");
}

#[test]
fn test_empty_byte_buffers() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Blob {
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
    }

    // A plain Vec<u8> has no element to inspect, so it falls back to a list.
    assert_eq!(to_vec(&Vec::<u8>::new()).unwrap(), b"0:]");
    assert_eq!(to_vec(&serde_bytes::ByteBuf::new()).unwrap(), b"0:,");

    let wire = to_vec(&Blob { data: vec![] }).unwrap();
    assert_eq!(wire, b"10:4:data,0:,}");
    assert_eq!(from_slice::<Blob>(&wire).unwrap(), Blob { data: vec![] });
}

#[test]
fn test_encode_maps() {
    assert_eq!(to_vec(&HashMap::<String, Value>::new()).unwrap(), b"0:}");

    let mut map = Map::new();
    map.insert("foo".to_string(), Value::Null);
    map.insert("bar".to_string(), Value::from(1));
    assert_eq!(to_vec(&map).unwrap(), b"19:3:bar,1:1#3:foo,0:~}");
}

#[test]
fn test_decode_strings() {
    assert_eq!(from_slice::<String>(b"0:,").unwrap(), "");
    assert_eq!(from_slice::<String>(b"13:Hello, World!,").unwrap(), "Hello, World!");
    assert!(matches!(
        decode_err::<String>(b"1000:foo,"),
        Error::UnexpectedEof(_)
    ));
    assert!(matches!(decode_err::<String>(b"2:foo,"), Error::InvalidTag(b'o')));
}

#[test]
fn test_decode_integers() {
    assert!(matches!(decode_err::<i64>(b"0:#"), Error::InvalidInteger(_)));
    assert_eq!(from_slice::<i64>(b"5:12345#").unwrap(), 12345);
    assert_eq!(from_slice::<i64>(b"6:-12345#").unwrap(), -12345);
    assert!(matches!(decode_err::<i64>(b"1000:1#"), Error::UnexpectedEof(_)));
    assert!(matches!(decode_err::<i64>(b"2:123#"), Error::InvalidTag(b'3')));

    assert_eq!(from_slice::<u64>(b"5:12345#").unwrap(), 12345);
    assert!(matches!(decode_err::<u64>(b"6:-12345#"), Error::InvalidInteger(_)));
}

#[test]
fn test_decode_floats() {
    assert!(matches!(decode_err::<f32>(b"0:^"), Error::InvalidFloat(_)));
    assert_eq!(from_slice::<f32>(b"6:.12345^").unwrap(), 0.12345);
    assert_eq!(from_slice::<f32>(b"7:-.12345^").unwrap(), -0.12345);
    assert!(matches!(decode_err::<f32>(b"1000:.1^"), Error::UnexpectedEof(_)));
    assert!(matches!(decode_err::<f32>(b"2:.123^"), Error::InvalidTag(b'2')));
}

#[test]
fn test_decode_booleans() {
    assert!(matches!(decode_err::<bool>(b"0:!"), Error::InvalidBool(_)));
    assert!(from_slice::<bool>(b"4:true!").unwrap());
    assert!(!from_slice::<bool>(b"5:false!").unwrap());
    assert!(matches!(decode_err::<bool>(b"1000:true!"), Error::UnexpectedEof(_)));
    assert!(matches!(decode_err::<bool>(b"2:false!"), Error::InvalidTag(b'l')));
}

#[test]
fn test_decode_null() {
    assert_eq!(from_slice::<Option<Box<i32>>>(b"0:~").unwrap(), None);
    assert_eq!(from_slice::<Option<Box<i32>>>(b"3:abc~").unwrap(), None);
    assert!(matches!(
        decode_err::<Option<i32>>(b"1000:~"),
        Error::UnexpectedEof(_)
    ));
}

#[test]
fn test_decode_maps() {
    assert!(from_slice::<HashMap<String, Value>>(b"0:}").unwrap().is_empty());

    let map: HashMap<String, Value> = from_slice(b"12:3:foo,3:bar,}").unwrap();
    assert_eq!(map.get("foo"), Some(&Value::from("bar")));

    assert!(matches!(
        decode_err::<HashMap<String, Value>>(b"1000:3:foo,3:bar,}"),
        Error::UnexpectedEof(_)
    ));
    assert!(matches!(
        decode_err::<HashMap<String, Value>>(b"2:3:foo,3:bar,}"),
        Error::InvalidTag(b'f')
    ));
}

#[test]
fn test_decode_structs() {
    #[derive(Deserialize, Debug, Default, PartialEq)]
    struct Labels {
        no_tag: String,
        named: String,
    }

    assert_eq!(from_slice::<Labels>(b"0:}").unwrap(), Labels::default());
    assert_eq!(
        from_slice::<Labels>(b"14:5:named,3:bar,}").unwrap(),
        Labels {
            no_tag: String::new(),
            named: "bar".to_string(),
        }
    );
}

#[test]
fn test_decode_arrays() {
    assert_eq!(from_slice::<[String; 2]>(b"0:]").unwrap(), ["", ""]);
    assert_eq!(from_slice::<[String; 2]>(b"12:3:foo,3:bar,]").unwrap(), ["foo", "bar"]);
    assert_eq!(from_slice::<[String; 2]>(b"6:3:foo,]").unwrap(), ["foo", ""]);
    assert_eq!(
        from_slice::<[String; 2]>(b"18:3:foo,3:bar,3:baz,]").unwrap(),
        ["foo", "bar"]
    );
    assert!(matches!(
        decode_err::<[String; 2]>(b"1000:3:foo,3:bar,]"),
        Error::UnexpectedEof(_)
    ));
    assert!(matches!(
        decode_err::<[String; 2]>(b"2:3:foo,3:bar,]"),
        Error::InvalidTag(b'f')
    ));
}

#[test]
fn test_decode_slices() {
    assert!(from_slice::<Vec<String>>(b"0:]").unwrap().is_empty());
    assert_eq!(from_slice::<Vec<String>>(b"12:3:foo,3:bar,]").unwrap(), ["foo", "bar"]);
    assert_eq!(from_slice::<Vec<String>>(b"6:3:foo,]").unwrap(), ["foo"]);
    assert_eq!(
        from_slice::<Vec<String>>(b"18:3:foo,3:bar,3:baz,]").unwrap(),
        ["foo", "bar", "baz"]
    );
    assert!(matches!(
        decode_err::<Vec<String>>(b"1000:3:foo,3:bar,]"),
        Error::UnexpectedEof(_)
    ));
    assert!(matches!(
        decode_err::<Vec<String>>(b"2:3:foo,3:bar,]"),
        Error::InvalidTag(b'f')
    ));
}

#[test]
fn test_decode_dynamic() {
    assert_eq!(from_slice::<Value>(b"3:abc,").unwrap(), Value::from("abc"));
    assert_eq!(from_slice::<Value>(b"3:123#").unwrap(), Value::Integer(123));
    assert_eq!(from_slice::<Value>(b"4:.123^").unwrap(), Value::Float(0.123));
    assert_eq!(from_slice::<Value>(b"4:true!").unwrap(), Value::Bool(true));
    assert_eq!(from_slice::<Value>(b"0:~").unwrap(), Value::Null);

    let dict = from_slice::<Value>(b"12:3:foo,3:bar,}").unwrap();
    assert_eq!(dict.get("foo"), Some(&Value::from("bar")));

    let list = from_slice::<Value>(b"12:3:foo,3:bar,]").unwrap();
    assert_eq!(list, Value::List(vec![Value::from("foo"), Value::from("bar")]));
}

#[test]
fn test_size_field_errors() {
    assert!(matches!(
        decode_err::<String>(b"12345678901:x,"),
        Error::SizeLimitExceeded(10)
    ));
    assert!(matches!(decode_err::<String>(b"1a:x,"), Error::InvalidSizeChar(b'a')));
    assert!(matches!(decode_err::<String>(b":x,"), Error::InvalidSizeChar(b':')));
    assert!(matches!(decode_err::<String>(b"12"), Error::UnexpectedEof(_)));
    assert!(matches!(decode_err::<String>(b"1:xy"), Error::InvalidTag(b'y')));
}

#[test]
fn test_type_mismatch_reports_tag_and_target() {
    match decode_err::<Vec<i32>>(b"1:1#") {
        Error::TypeMismatch { tag, expected } => {
            assert_eq!(tag, Tag::Integer);
            assert_eq!(expected, "sequence");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    for err in [
        decode_err::<Vec<Value>>(b"3:abc,"),
        decode_err::<Vec<i32>>(b"3:abc,"),
        decode_err::<(i64, i64)>(b"2:ab,"),
    ] {
        assert!(matches!(
            err,
            Error::TypeMismatch {
                tag: Tag::String,
                expected: "sequence"
            }
        ));
    }
}

#[test]
fn test_nested_error_invalidates_outer_value() {
    // The second element's integer payload is malformed.
    assert!(matches!(
        decode_err::<Vec<i32>>(b"9:1:1#2:+1#]"),
        Error::InvalidInteger(_)
    ));
}

#[test]
fn test_serde_json_cross_check() {
    let json: serde_json::Value = from_slice(b"33:4:list,13:1:1#3:two,0:~]3:obj,0:}}").unwrap();
    assert_eq!(json, json!({ "list": [1, "two", null], "obj": {} }));

    let value = json!({ "b": [true, 1.5], "a": "x" });
    assert_eq!(to_vec(&value).unwrap(), b"34:1:a,1:x,1:b,18:4:true!8:1.500000^]}");
}
