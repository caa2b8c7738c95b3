//! # serde_tnetstring
//!
//! A Serde-compatible codec for tnetstrings (tagged netstrings).
//!
//! ## What is a tnetstring?
//!
//! Every encoded value is a frame that carries its own length prefix and a
//! single trailing type byte:
//!
//! ```text
//! 12:hello, world,     a string
//! 5:12345#             an integer
//! 12:3:foo,3:bar,]     a list of two strings
//! 19:3:bar,1:1#3:foo,0:~}   a dictionary
//! ```
//!
//! A stream of frames can be split without knowing any schema and without
//! scanning payloads for delimiters: the size prefix says exactly where each
//! frame ends.
//!
//! ## Key Features
//!
//! - **Serde Compatible**: Works with existing Rust types via `#[derive(Serialize, Deserialize)]`
//! - **Deterministic**: Mapping keys are written sorted, floats with fixed precision
//! - **Streaming**: Reads from any `io::Read`, one frame per value, no read-ahead
//! - **Bounded**: Nesting depth is capped on both encode and decode
//! - **Field Directives**: The [`record!`] macro renames, skips and omits empty fields
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tnetstring::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let wire = to_vec(&user).unwrap();
//! assert_eq!(wire, b"42:2:id,3:123#4:name,5:Alice,6:active,4:true!}");
//!
//! let user_back: User = from_slice(&wire).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values with tnet! Macro
//!
//! ```rust
//! use serde_tnetstring::{tnet, Value};
//!
//! let data = tnet!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "serde"]
//! });
//!
//! if let Value::Dict(dict) = data {
//!     assert_eq!(dict.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! }
//! ```
//!
//! ## Type Mapping
//!
//! | Rust                               | Tag |
//! |------------------------------------|-----|
//! | `String`, `&str`, `char`, bytes    | `,` |
//! | integers up to 128 bits            | `#` |
//! | `f32`, `f64`                       | `^` |
//! | `bool`                             | `!` |
//! | `None`, `()`, unit structs         | `~` |
//! | maps, structs                      | `}` |
//! | `Vec<T>`, arrays, tuples           | `]` |
//!
//! `Some(v)` is written as `v`. Enums use externally tagged form: a unit
//! variant is its name, any other variant is a one-entry dictionary.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Declared sizes never force an allocation larger than the input provides
//! - Proper error propagation with `Result` types

pub mod de;
pub mod error;
pub mod field;
pub mod frame;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use de::{Deserializer, StreamDeserializer};
pub use error::{Error, Result};
pub use field::{FieldTag, FieldTags, Record};
pub use frame::{Frame, Tag};
pub use map::Map;
pub use options::TnetOptions;
pub use ser::Serializer;
pub use value::Value;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` as one frame into a writer.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec!["foo", "bar"]).unwrap();
/// assert_eq!(buffer, b"12:3:foo,3:bar,]");
/// ```
///
/// # Errors
///
/// Returns an error if the value has no wire mapping or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, TnetOptions::default())
}

/// Serialize any `T: Serialize` into a writer with custom options.
///
/// # Errors
///
/// Returns an error if the value has no wire mapping, nests deeper than
/// `options.max_depth`, or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(writer: W, value: &T, options: TnetOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::with_options(writer, options);
    value.serialize(&mut serializer)
}

/// Serialize any `T: Serialize` to a byte vector.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::to_vec;
///
/// assert_eq!(to_vec(&12345).unwrap(), b"5:12345#");
/// assert_eq!(to_vec(&None::<u8>).unwrap(), b"0:~");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized (e.g., non-string map keys).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, TnetOptions::default())
}

/// Serialize any `T: Serialize` to a byte vector with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: TnetOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut buffer = Vec::with_capacity(128);
    to_writer_with_options(&mut buffer, value, options)?;
    Ok(buffer)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// The value is what decoding its encoding would produce, so byte strings
/// that happen to be valid UTF-8 come back as [`Value::String`].
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_dict());
/// assert_eq!(value.get("y"), Some(&Value::Integer(2)));
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    from_slice(&to_vec(value)?)
}

/// Deserialize an instance of type `T` from a single frame.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::from_slice;
/// use std::collections::HashMap;
///
/// let map: HashMap<String, String> = from_slice(b"12:3:foo,3:bar,}").unwrap();
/// assert_eq!(map["foo"], "bar");
/// ```
///
/// # Errors
///
/// Returns an error if the input is not exactly one well-formed frame or
/// cannot be decoded into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice_with_options(v, TnetOptions::default())
}

/// Deserialize an instance of type `T` from a single frame with custom options.
///
/// # Errors
///
/// Returns an error if the input is not exactly one well-formed frame,
/// nests deeper than `options.max_depth`, or cannot be decoded into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<T>(v: &[u8], options: TnetOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut deserializer = Deserializer::with_options(v, options);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// Deserialize an instance of type `T` from a string holding a single frame.
///
/// # Errors
///
/// Same as [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice(s.as_bytes())
}

/// Deserialize the next frame of an I/O stream.
///
/// Exactly one frame is consumed; the reader is left at the start of the next.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::from_reader;
/// use std::io::Cursor;
///
/// let mut cursor = Cursor::new(b"1:1#1:2#".to_vec());
/// let first: i32 = from_reader(&mut cursor).unwrap();
/// let second: i32 = from_reader(&mut cursor).unwrap();
/// assert_eq!((first, second), (1, 2));
/// ```
///
/// # Errors
///
/// Returns [`Error::Eof`] if the stream is already exhausted, and any
/// framing or decoding error otherwise.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut deserializer = Deserializer::from_reader(reader);
    T::deserialize(&mut deserializer)
}

/// Convert a [`Value`] into any `T: Deserialize`.
///
/// # Errors
///
/// Returns an error if the value does not fit the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice(&to_vec(&value)?)
}
