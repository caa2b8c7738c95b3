//! Declarative macros for building values and field-directive records.

/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Scalars go through `Value::from`, so any type with a `From` impl works.
/// Negative numbers and other multi-token expressions need parentheses.
///
/// ```rust
/// use serde_tnetstring::{tnet, to_vec};
///
/// let value = tnet!({ "foo": null, "bar": [1, (-2)] });
/// assert_eq!(to_vec(&value).unwrap(), b"27:3:bar,9:1:1#2:-2#]3:foo,0:~}");
/// ```
#[macro_export]
macro_rules! tnet {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(::std::vec![$($crate::tnet!($elem)),*])
    };

    ({}) => {
        $crate::Value::Dict($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut dict = $crate::Map::new();
        $(
            dict.insert(::std::string::ToString::to_string(&$key), $crate::tnet!($value));
        )*
        $crate::Value::Dict(dict)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

/// Declares a struct whose wire layout is controlled by field directives.
///
/// Each field may carry one `#[tnet = "..."]` directive (see [`field`](crate::field)
/// for the syntax). The macro implements [`Record`](crate::Record),
/// `Serialize` and `Deserialize`, all driven by the same
/// [`FieldTags`](crate::FieldTags) table. Every field type must implement
/// `Default` and `PartialEq`: missing keys decode to the zero value, and
/// `omitempty` compares against it.
///
/// ```rust
/// use serde_tnetstring::{from_slice, record, to_vec};
///
/// record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Account {
///         #[tnet = "id"]
///         pub account_id: u64,
///         #[tnet = "nick,omitempty"]
///         pub nickname: String,
///         #[tnet = "-"]
///         pub session: u32,
///     }
/// }
///
/// let account = Account { account_id: 7, nickname: String::new(), session: 99 };
/// let wire = to_vec(&account).unwrap();
/// assert_eq!(wire, b"9:2:id,1:7#}");
///
/// let back: Account = from_slice(&wire).unwrap();
/// assert_eq!(back, Account { account_id: 7, nickname: String::new(), session: 0 });
/// ```
#[macro_export]
macro_rules! record {
    (@directive) => {
        ::std::option::Option::None
    };

    (@directive $directive:literal) => {
        ::std::option::Option::Some($directive)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[tnet = $directive:literal])?
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($field_vis $field: $ty,)*
        }

        impl $crate::Record for $name {
            fn field_tags() -> &'static $crate::FieldTags {
                static TAGS: ::std::sync::OnceLock<$crate::FieldTags> = ::std::sync::OnceLock::new();
                TAGS.get_or_init(|| {
                    $crate::FieldTags::new(::std::vec![
                        $($crate::FieldTag::parse(
                            ::std::stringify!($field),
                            $crate::record!(@directive $($directive)?),
                        ),)*
                    ])
                })
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                use $crate::__private::serde::ser::SerializeStruct;

                let tags = <Self as $crate::Record>::field_tags();
                let mut state = serializer.serialize_struct(::std::stringify!($name), tags.names().len())?;
                let mut fields = tags.iter();
                $(
                    if let ::std::option::Option::Some(tag) = fields.next() {
                        if tag.includes(&self.$field) {
                            state.serialize_field(tag.display_name(), &self.$field)?;
                        }
                    }
                )*
                state.end()
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                struct RecordVisitor;

                impl<'de> $crate::__private::serde::de::Visitor<'de> for RecordVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                        f.write_str(::std::concat!("record ", ::std::stringify!($name)))
                    }

                    fn visit_map<A>(self, mut map: A) -> ::std::result::Result<$name, A::Error>
                    where
                        A: $crate::__private::serde::de::MapAccess<'de>,
                    {
                        let tags = <$name as $crate::Record>::field_tags();
                        let mut record = $name {
                            $($field: ::std::default::Default::default(),)*
                        };
                        while let ::std::option::Option::Some(key) =
                            map.next_key::<::std::string::String>()?
                        {
                            let name = match tags.resolve(&key) {
                                ::std::option::Option::Some(index) => tags[index].name(),
                                ::std::option::Option::None => {
                                    return ::std::result::Result::Err(
                                        <A::Error as $crate::__private::serde::de::Error>::unknown_field(
                                            &key,
                                            tags.names(),
                                        ),
                                    );
                                }
                            };
                            $(
                                if name == ::std::stringify!($field) {
                                    record.$field = map.next_value()?;
                                    continue;
                                }
                            )*
                            map.next_value::<$crate::__private::serde::de::IgnoredAny>()?;
                        }
                        ::std::result::Result::Ok(record)
                    }
                }

                deserializer.deserialize_struct(
                    ::std::stringify!($name),
                    <$name as $crate::Record>::field_tags().names(),
                    RecordVisitor,
                )
            }
        }
    };
}
