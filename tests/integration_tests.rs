use serde::{Deserialize, Serialize};
use serde_tnetstring::{
    from_reader, from_slice, to_value, to_vec, to_vec_with_options, Deserializer, Error,
    TnetOptions, Value,
};
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
    note: Option<String>,
}

fn alice() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    }
}

#[test]
fn test_simple_struct() {
    let user = alice();
    let wire = to_vec(&user).unwrap();
    let user_back: User = from_slice(&wire).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_struct() {
    let order = Order {
        order_id: 12345,
        customer: alice(),
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        total: 109.97,
        note: None,
    };

    let wire = to_vec(&order).unwrap();
    let order_back: Order = from_slice(&wire).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_primitives() {
    assert_roundtrip(&42i32);
    assert_roundtrip(&3.5f64);
    assert_roundtrip(&true);
    assert_roundtrip(&false);
    assert_roundtrip(&"hello world".to_string());
    assert_roundtrip(&vec![1, 2, 3, 4, 5]);
    assert_roundtrip(&'é');
    assert_roundtrip(&());
}

#[test]
fn test_numbers_at_width_boundaries() {
    assert_roundtrip(&i8::MIN);
    assert_roundtrip(&i8::MAX);
    assert_roundtrip(&i16::MIN);
    assert_roundtrip(&i16::MAX);
    assert_roundtrip(&i32::MIN);
    assert_roundtrip(&i32::MAX);
    assert_roundtrip(&i64::MIN);
    assert_roundtrip(&i64::MAX);
    assert_roundtrip(&i128::MIN);
    assert_roundtrip(&u8::MAX);
    assert_roundtrip(&u16::MAX);
    assert_roundtrip(&u32::MAX);
    assert_roundtrip(&u64::MAX);
    assert_roundtrip(&u128::MAX);

    assert_roundtrip(&0.0f32);
    assert_roundtrip(&-2.5f32);
    assert_roundtrip(&0.0f64);
    assert_roundtrip(&-5.75f64);
    assert_roundtrip(&1e15f64);
}

#[test]
fn test_special_strings() {
    let strings = [
        "",
        "hello, world",
        "3:abc,",
        "line1\nline2",
        "nul\0inside",
        "日本語",
        "0:~",
        "}]#^!~,",
    ];

    for s in strings {
        assert_roundtrip(&s.to_string());
    }
}

#[test]
fn test_empty_collections() {
    assert_roundtrip(&Vec::<i32>::new());
    assert_roundtrip(&HashMap::<String, i32>::new());

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Empty {}

    assert_roundtrip(&Empty {});
}

#[test]
fn test_maps_are_deterministic() {
    let mut forward = HashMap::new();
    let mut backward = HashMap::new();
    for i in 0..50 {
        forward.insert(format!("key{}", i), i);
    }
    for i in (0..50).rev() {
        backward.insert(format!("key{}", i), i);
    }

    let wire = to_vec(&forward).unwrap();
    assert_eq!(wire, to_vec(&backward).unwrap());

    let as_btree: BTreeMap<String, i32> = from_slice(&wire).unwrap();
    assert_eq!(to_vec(&as_btree).unwrap(), wire);
}

#[test]
fn test_map_of_options() {
    let mut map = HashMap::new();
    map.insert("bar".to_string(), Some(1));
    map.insert("foo".to_string(), None);

    let wire = to_vec(&map).unwrap();
    assert_eq!(wire, b"19:3:bar,1:1#3:foo,0:~}");

    let back: HashMap<String, Option<i32>> = from_slice(&wire).unwrap();
    assert_eq!(back, map);
}

#[test]
fn test_non_string_keys_rejected() {
    let mut map = HashMap::new();
    map.insert(vec![1], "x");
    assert!(matches!(to_vec(&map), Err(Error::NonStringKey)));

    let mut map = HashMap::new();
    map.insert(true, "x");
    assert!(matches!(to_vec(&map), Err(Error::NonStringKey)));
}

#[test]
fn test_enum_roundtrip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Event {
        Started,
        Progress(u8),
        Moved { x: i32, y: i32 },
        Pair(String, bool),
    }

    assert_roundtrip(&vec![
        Event::Started,
        Event::Progress(50),
        Event::Moved { x: -1, y: 1 },
        Event::Pair("a".to_string(), true),
    ]);
}

#[test]
fn test_serde_attributes() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Settings {
        display_name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        extra_paths: Vec<String>,
    }

    let settings = Settings {
        display_name: "main".to_string(),
        extra_paths: vec![],
    };
    let wire = to_vec(&settings).unwrap();
    assert_eq!(wire, b"22:11:displayName,4:main,}");
    assert_roundtrip(&settings);
}

#[test]
fn test_byte_buffers() {
    let bytes: Vec<u8> = vec![0, 159, 146, 150, 255];
    let wire = to_vec(&bytes).unwrap();
    assert_eq!(wire, b"5:\x00\x9f\x92\x96\xff,");
    assert_roundtrip(&bytes);

    // Not UTF-8, so a dynamic target keeps the raw bytes.
    let value: Value = from_slice(&wire).unwrap();
    assert_eq!(value, Value::Bytes(bytes.clone()));
    assert!(matches!(from_slice::<String>(&wire), Err(Error::InvalidUtf8)));

    let options = TnetOptions::new().with_bytes_as_strings(false);
    let as_list = to_vec_with_options(&bytes, options).unwrap();
    assert_eq!(from_slice::<Vec<u8>>(&as_list).unwrap(), bytes);
}

#[test]
fn test_to_value() {
    match to_value(&alice()).unwrap() {
        Value::Dict(dict) => {
            assert_eq!(dict.get("id"), Some(&Value::Integer(123)));
            assert_eq!(dict.get("name"), Some(&Value::String("Alice".to_string())));
            assert_eq!(dict.get("active"), Some(&Value::Bool(true)));

            let tags = dict.get("tags").and_then(Value::as_list).unwrap();
            assert_eq!(tags.len(), 2);
            assert_eq!(tags[0], Value::String("admin".to_string()));
        }
        other => panic!("Expected dictionary, got {:?}", other),
    }
}

#[test]
fn test_value_roundtrip_keeps_wire_order() {
    let value: Value = from_slice(b"16:1:z,1:1#1:a,1:2#}").unwrap();
    let keys: Vec<_> = value.as_dict().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["z", "a"]);

    // Encoding sorts regardless of the decoded order.
    assert_eq!(to_vec(&value).unwrap(), b"16:1:a,1:2#1:z,1:1#}");
}

#[test]
fn test_stream_of_frames() {
    let mut wire = Vec::new();
    for user in [alice(), alice()] {
        wire.extend(to_vec(&user).unwrap());
    }
    wire.extend(b"0:~");

    let mut cursor = Cursor::new(wire);
    let first: User = from_reader(&mut cursor).unwrap();
    let second: User = from_reader(&mut cursor).unwrap();
    let last: Option<User> = from_reader(&mut cursor).unwrap();
    assert_eq!(first, second);
    assert_eq!(last, None);
    assert!(matches!(from_reader::<_, User>(&mut cursor), Err(Error::Eof)));
}

#[test]
fn test_stream_deserializer() {
    let input: &[u8] = b"3:one,3:two,5:three,";
    let words: Vec<String> = Deserializer::from_reader(input)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(words, vec!["one", "two", "three"]);
}

#[test]
fn test_self_referential_depth() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Node {
        children: Vec<Node>,
    }

    let mut node = Node { children: vec![] };
    for _ in 0..99 {
        node = Node {
            children: vec![node],
        };
    }
    assert!(matches!(to_vec(&node), Err(Error::DepthLimitExceeded(128))));

    let options = TnetOptions::new().with_max_depth(256);
    let wire = to_vec_with_options(&node, options).unwrap();
    assert!(matches!(
        from_slice::<Node>(&wire),
        Err(Error::DepthLimitExceeded(128))
    ));
    let back: Node = serde_tnetstring::from_slice_with_options(&wire, options).unwrap();
    assert_eq!(back, node);
}

fn assert_roundtrip<T>(original: &T)
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug,
{
    let wire = to_vec(original).unwrap();
    let deserialized: T = from_slice(&wire).unwrap();
    assert_eq!(*original, deserialized);
}
