//! Tnetstring deserialization.
//!
//! This module provides the [`Deserializer`] that reads tnetstring frames from
//! any [`io::Read`] source into Rust data structures.
//!
//! ## Overview
//!
//! Each top-level call reads exactly one frame and branches on its tag. The
//! payload of a dictionary or list frame is already in memory once the frame
//! is read, so nested frames are decoded from a sub-reader scoped to exactly
//! those bytes:
//!
//! - **Growable targets** (`Vec<T>`) get exactly the decoded element count
//! - **Fixed targets** (`[T; N]`, tuples) drop excess elements and zero-fill
//!   missing ones
//! - **Null** (`0:~`) yields `None` for options and the zero value otherwise
//! - **Records** reject dictionary keys that name no field
//!
//! ## Usage
//!
//! ```rust
//! use serde_tnetstring::from_slice;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, y: i32 }
//!
//! let data: Data = from_slice(b"16:1:x,1:1#1:y,1:2#}").unwrap();
//! assert_eq!(data, Data { x: 1, y: 2 });
//! ```
//!
//! ## Streams
//!
//! ```rust
//! use serde_tnetstring::Deserializer;
//!
//! let input: &[u8] = b"1:1#1:2#1:3#";
//! let values: Vec<i32> = Deserializer::from_reader(input)
//!     .into_iter::<i32>()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(values, vec![1, 2, 3]);
//! ```

use crate::frame::{self, Frame, Tag};
use crate::{Error, Result, TnetOptions};
use log::debug;
use serde::de::{self, DeserializeOwned, IntoDeserializer, Unexpected, Visitor};
use serde::forward_to_deserialize_any;
use std::io;
use std::marker::PhantomData;
use std::str::{self, FromStr};

/// The tnetstring deserializer.
///
/// Reads one frame per top-level `deserialize` call, leaving the source
/// positioned at the start of the next frame.
pub struct Deserializer<R> {
    reader: R,
    max_depth: usize,
}

impl<R: io::Read> Deserializer<R> {
    pub fn from_reader(reader: R) -> Self {
        Self::with_options(reader, TnetOptions::default())
    }

    pub fn with_options(reader: R, options: TnetOptions) -> Self {
        Deserializer {
            reader,
            max_depth: options.max_depth,
        }
    }

    /// Reads the next raw frame, or `None` at a clean end of input.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        frame::read_frame(&mut self.reader)
    }

    fn frame(&mut self) -> Result<FrameDeserializer> {
        match self.next_frame()? {
            Some(frame) => Ok(FrameDeserializer::new(frame, self.max_depth, 0)),
            None => Err(Error::Eof),
        }
    }

    /// Turns this deserializer into an iterator over consecutive top-level values.
    pub fn into_iter<T: DeserializeOwned>(self) -> StreamDeserializer<R, T> {
        StreamDeserializer {
            de: self,
            failed: false,
            output: PhantomData,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<'a> Deserializer<&'a [u8]> {
    pub fn from_slice(input: &'a [u8]) -> Self {
        Self::from_reader(input)
    }

    /// Checks that the whole input has been consumed.
    ///
    /// # Errors
    ///
    /// [`Error::TrailingBytes`] with the number of unread bytes.
    pub fn end(&self) -> Result<()> {
        if self.reader.is_empty() {
            Ok(())
        } else {
            Err(Error::TrailingBytes(self.reader.len()))
        }
    }
}

macro_rules! forward_to_frame {
    ($($method:ident($($arg:ident: $ty:ty),*)),* $(,)?) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                de::Deserializer::$method(self.frame()?, $($arg,)* visitor)
            }
        )*
    };
}

impl<'de, R: io::Read> de::Deserializer<'de> for &mut Deserializer<R> {
    type Error = Error;

    forward_to_frame! {
        deserialize_any(),
        deserialize_bool(),
        deserialize_i8(),
        deserialize_i16(),
        deserialize_i32(),
        deserialize_i64(),
        deserialize_i128(),
        deserialize_u8(),
        deserialize_u16(),
        deserialize_u32(),
        deserialize_u64(),
        deserialize_u128(),
        deserialize_f32(),
        deserialize_f64(),
        deserialize_char(),
        deserialize_str(),
        deserialize_string(),
        deserialize_bytes(),
        deserialize_byte_buf(),
        deserialize_option(),
        deserialize_unit(),
        deserialize_unit_struct(name: &'static str),
        deserialize_newtype_struct(name: &'static str),
        deserialize_seq(),
        deserialize_tuple(len: usize),
        deserialize_tuple_struct(name: &'static str, len: usize),
        deserialize_map(),
        deserialize_struct(name: &'static str, fields: &'static [&'static str]),
        deserialize_enum(name: &'static str, variants: &'static [&'static str]),
        deserialize_identifier(),
        deserialize_ignored_any(),
    }
}

/// Iterator over the top-level values of a frame stream.
///
/// Created by [`Deserializer::into_iter`]. Ends at a clean end of input and
/// after the first error.
pub struct StreamDeserializer<R, T> {
    de: Deserializer<R>,
    failed: bool,
    output: PhantomData<T>,
}

impl<R: io::Read, T: DeserializeOwned> Iterator for StreamDeserializer<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        if self.failed {
            return None;
        }
        let result = match self.de.next_frame() {
            Ok(None) => return None,
            Ok(Some(frame)) => T::deserialize(FrameDeserializer::new(frame, self.de.max_depth, 0)),
            Err(e) => Err(e),
        };
        self.failed = result.is_err();
        Some(result)
    }
}

/// Decodes a single frame that has already been read.
struct FrameDeserializer {
    frame: Frame,
    max_depth: usize,
    depth: usize,
}

impl FrameDeserializer {
    fn new(frame: Frame, max_depth: usize, depth: usize) -> Self {
        FrameDeserializer {
            frame,
            max_depth,
            depth,
        }
    }

    fn zero(&self) -> ZeroDeserializer {
        ZeroDeserializer {
            max_depth: self.max_depth,
            depth: self.depth,
        }
    }

    /// Returns the depth of frames nested inside this composite one.
    fn enter(&self) -> Result<usize> {
        if self.depth >= self.max_depth {
            debug!(
                "rejecting {} frame nested deeper than {}",
                self.frame.tag, self.max_depth
            );
            return Err(Error::DepthLimitExceeded(self.max_depth));
        }
        Ok(self.depth + 1)
    }

    fn lossy(&self) -> String {
        String::from_utf8_lossy(&self.frame.payload).into_owned()
    }

    fn into_text(self) -> Result<String> {
        String::from_utf8(self.frame.payload).map_err(|_| Error::InvalidUtf8)
    }

    fn integer<T: FromStr>(&self) -> Result<T> {
        let payload = &self.frame.payload;
        let digits = match payload.split_first() {
            Some((b'-', rest)) => rest,
            _ => &payload[..],
        };
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return Err(Error::InvalidInteger(self.lossy()));
        }
        str::from_utf8(payload)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| Error::InvalidInteger(self.lossy()))
    }

    /// Parses a float payload; values that overflow the target width are rejected.
    fn float<T: FromStr + Copy + Into<f64>>(&self) -> Result<T> {
        if !is_float_text(&self.frame.payload) {
            return Err(Error::InvalidFloat(self.lossy()));
        }
        str::from_utf8(&self.frame.payload)
            .ok()
            .and_then(|text| text.parse::<T>().ok())
            .filter(|value| Into::<f64>::into(*value).is_finite())
            .ok_or_else(|| Error::InvalidFloat(self.lossy()))
    }

    fn boolean(&self) -> Result<bool> {
        match self.frame.payload.as_slice() {
            b"true" => Ok(true),
            b"false" => Ok(false),
            _ => Err(Error::InvalidBool(self.lossy())),
        }
    }

    fn visit_list<'de, V>(self, visitor: V, capacity: Option<usize>) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let depth = self.enter()?;
        let hint = capacity.unwrap_or_else(|| frame::count_frames(&self.frame.payload));
        visitor.visit_seq(ListAccess {
            input: &self.frame.payload,
            remaining: capacity,
            hint,
            max_depth: self.max_depth,
            depth,
        })
    }

    fn visit_dict<'de, V>(self, visitor: V, fields: Option<&'static [&'static str]>) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let depth = self.enter()?;
        visitor.visit_map(DictAccess::new(&self.frame.payload, fields, self.max_depth, depth))
    }

    fn visit_byte_seq<'de, V>(self, visitor: V, capacity: Option<usize>) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(ByteAccess {
            bytes: self.frame.payload.into_iter(),
            remaining: capacity,
        })
    }
}

/// Accepts `-?[0-9]*(\.[0-9]*)?([eE][-+]?[0-9]+)?` with at least one mantissa digit.
fn is_float_text(text: &[u8]) -> bool {
    let digits = |i: &mut usize| -> usize {
        let start = *i;
        while text.get(*i).map_or(false, u8::is_ascii_digit) {
            *i += 1;
        }
        *i - start
    };

    let mut i = usize::from(text.first() == Some(&b'-'));
    let mut mantissa = digits(&mut i);
    if text.get(i) == Some(&b'.') {
        i += 1;
        mantissa += digits(&mut i);
    }
    if mantissa == 0 {
        return false;
    }
    if matches!(text.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(text.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return false;
        }
    }
    i == text.len()
}

macro_rules! deserialize_number {
    ($tag:pat, $parse:ident, $expected:literal, $($method:ident => $visit:ident),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.frame.tag {
                    $tag => visitor.$visit(self.$parse()?),
                    Tag::Null => de::Deserializer::$method(self.zero(), visitor),
                    tag => Err(Error::type_mismatch(tag, $expected)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for FrameDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::String => match String::from_utf8(self.frame.payload) {
                Ok(text) => visitor.visit_string(text),
                Err(e) => visitor.visit_byte_buf(e.into_bytes()),
            },
            Tag::Integer => visitor.visit_i64(self.integer()?),
            Tag::Float => visitor.visit_f64(self.float()?),
            Tag::Boolean => visitor.visit_bool(self.boolean()?),
            Tag::Null => visitor.visit_unit(),
            Tag::Dictionary => self.visit_dict(visitor, None),
            Tag::List => self.visit_list(visitor, None),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::Boolean => visitor.visit_bool(self.boolean()?),
            Tag::Null => visitor.visit_bool(false),
            tag => Err(Error::type_mismatch(tag, "boolean")),
        }
    }

    deserialize_number! {
        Tag::Integer, integer, "integer",
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
    }

    deserialize_number! {
        Tag::Float, float, "float",
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::String => {
                let text = self.into_text()?;
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(de::Error::invalid_value(
                        Unexpected::Str(&text),
                        &"a single character",
                    )),
                }
            }
            Tag::Null => visitor.visit_char('\0'),
            tag => Err(Error::type_mismatch(tag, "char")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::String => visitor.visit_string(self.into_text()?),
            Tag::Null => visitor.visit_str(""),
            tag => Err(Error::type_mismatch(tag, "string")),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::String => visitor.visit_byte_buf(self.frame.payload),
            Tag::List => self.visit_list(visitor, None),
            Tag::Null => visitor.visit_bytes(&[]),
            tag => Err(Error::type_mismatch(tag, "bytes")),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::Null => visitor.visit_unit(),
            tag => Err(Error::type_mismatch(tag, "unit")),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::List => self.visit_list(visitor, None),
            Tag::String => self.visit_byte_seq(visitor, None),
            Tag::Null => de::Deserializer::deserialize_seq(self.zero(), visitor),
            tag => Err(Error::type_mismatch(tag, "sequence")),
        }
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::List => self.visit_list(visitor, Some(len)),
            Tag::String => self.visit_byte_seq(visitor, Some(len)),
            Tag::Null => de::Deserializer::deserialize_tuple(self.zero(), len, visitor),
            tag => Err(Error::type_mismatch(tag, "tuple")),
        }
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::Dictionary => self.visit_dict(visitor, None),
            Tag::Null => de::Deserializer::deserialize_map(self.zero(), visitor),
            tag => Err(Error::type_mismatch(tag, "map")),
        }
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::Dictionary => self.visit_dict(visitor, Some(fields)),
            Tag::Null => {
                de::Deserializer::deserialize_struct(self.zero(), name, fields, visitor)
            }
            tag => Err(Error::type_mismatch(tag, "struct")),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::String => {
                let variant: de::value::StringDeserializer<Error> =
                    self.into_text()?.into_deserializer();
                visitor.visit_enum(variant)
            }
            Tag::Dictionary => {
                let depth = self.enter()?;
                let mut input = self.frame.payload.as_slice();
                let key = frame::read_frame(&mut input)?
                    .ok_or_else(|| Error::custom("expected a single-entry dictionary for enum"))?;
                if key.tag != Tag::String {
                    return Err(Error::type_mismatch(key.tag, "variant name"));
                }
                let value = frame::read_frame(&mut input)?
                    .ok_or(Error::UnexpectedEof("variant value"))?;
                if !input.is_empty() {
                    return Err(Error::custom("expected a single-entry dictionary for enum"));
                }
                visitor.visit_enum(EnumAccess {
                    variant: FrameDeserializer::new(key, self.max_depth, depth),
                    value: FrameDeserializer::new(value, self.max_depth, depth),
                })
            }
            tag => Err(Error::type_mismatch(tag, "enum")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.frame.tag {
            Tag::String => visitor.visit_string(self.into_text()?),
            tag => Err(Error::type_mismatch(tag, "identifier")),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        // The frame is already consumed whole.
        visitor.visit_unit()
    }
}

/// Elements of a list payload.
///
/// With `remaining` set the access yields exactly that many elements,
/// padding with zero values or leaving extra frames unread.
struct ListAccess<'a> {
    input: &'a [u8],
    remaining: Option<usize>,
    hint: usize,
    max_depth: usize,
    depth: usize,
}

impl<'de, 'a> de::SeqAccess<'de> for ListAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return Ok(None);
            }
            *remaining -= 1;
        }
        self.hint = self.hint.saturating_sub(1);

        match frame::read_frame(&mut self.input)? {
            Some(frame) => seed
                .deserialize(FrameDeserializer::new(frame, self.max_depth, self.depth))
                .map(Some),
            None if self.remaining.is_some() => seed
                .deserialize(ZeroDeserializer {
                    max_depth: self.max_depth,
                    depth: self.depth,
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.hint)
    }
}

/// Bytes of a string payload, yielded one `u8` at a time.
///
/// A fixed-size target longer than the payload is padded with zero bytes.
struct ByteAccess {
    bytes: std::vec::IntoIter<u8>,
    remaining: Option<usize>,
}

impl<'de> de::SeqAccess<'de> for ByteAccess {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return Ok(None);
            }
            *remaining -= 1;
        }
        match self.bytes.next() {
            Some(byte) => seed.deserialize(ByteDeserializer(byte)).map(Some),
            None if self.remaining.is_some() => seed.deserialize(ByteDeserializer(0)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining.unwrap_or_else(|| self.bytes.len()))
    }
}

/// One element of a string frame read as a sequence.
///
/// Only `u8` elements can come from a string frame; any other element type
/// is a mismatch against the string tag.
struct ByteDeserializer(u8);

impl<'de> de::Deserializer<'de> for ByteDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::type_mismatch(Tag::String, "sequence"))
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u8(self.0)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier
    }
}

/// Key and value frames of a dictionary payload.
///
/// When decoding a record, fields with no key in the payload are yielded
/// after the last frame, each paired with its zero value.
struct DictAccess<'a> {
    input: &'a [u8],
    // Field names of the record being decoded, if any.
    fields: Option<&'static [&'static str]>,
    seen: Vec<bool>,
    // Set while the value of a zero-filled field is pending.
    filling: bool,
    max_depth: usize,
    depth: usize,
}

impl<'a> DictAccess<'a> {
    fn new(input: &'a [u8], fields: Option<&'static [&'static str]>, max_depth: usize, depth: usize) -> Self {
        DictAccess {
            input,
            fields,
            seen: vec![false; fields.map_or(0, <[_]>::len)],
            filling: false,
            max_depth,
            depth,
        }
    }

    fn zero(&self) -> ZeroDeserializer {
        ZeroDeserializer {
            max_depth: self.max_depth,
            depth: self.depth,
        }
    }

    fn next_missing<'de, K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some(fields) = self.fields else {
            return Ok(None);
        };
        let Some(index) = self.seen.iter().position(|seen| !seen) else {
            return Ok(None);
        };
        self.seen[index] = true;
        self.filling = true;
        let field: de::value::StrDeserializer<Error> = fields[index].into_deserializer();
        seed.deserialize(field).map(Some)
    }
}

impl<'de, 'a> de::MapAccess<'de> for DictAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some(key) = frame::read_frame(&mut self.input)? else {
            return self.next_missing(seed);
        };
        if key.tag != Tag::String {
            return Err(Error::type_mismatch(key.tag, "dictionary key"));
        }
        if let Some(fields) = self.fields {
            let name = str::from_utf8(&key.payload).map_err(|_| Error::InvalidUtf8)?;
            match fields.iter().position(|field| *field == name) {
                Some(index) => self.seen[index] = true,
                None => {
                    debug!("rejecting unknown field {:?}", name);
                    return Err(Error::UnknownField {
                        field: name.to_string(),
                        expected: fields,
                    });
                }
            }
        }
        seed.deserialize(FrameDeserializer::new(key, self.max_depth, self.depth))
            .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        if self.filling {
            self.filling = false;
            return seed.deserialize(self.zero());
        }
        let value = frame::read_frame(&mut self.input)?
            .ok_or(Error::UnexpectedEof("dictionary value"))?;
        seed.deserialize(FrameDeserializer::new(value, self.max_depth, self.depth))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(frame::count_frames(self.input) / 2)
    }
}

/// The `{variant: payload}` form of an enum.
struct EnumAccess {
    variant: FrameDeserializer,
    value: FrameDeserializer,
}

impl<'de> de::EnumAccess<'de> for EnumAccess {
    type Error = Error;
    type Variant = FrameDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, FrameDeserializer)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(self.variant)?;
        Ok((variant, self.value))
    }
}

impl<'de> de::VariantAccess<'de> for FrameDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.frame.tag {
            Tag::Null => Ok(()),
            tag => Err(Error::type_mismatch(tag, "unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self, len, visitor)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_struct(self, "", fields, visitor)
    }
}

/// Produces the zero value of whatever shape is requested.
///
/// Used for null frames and for the missing tail of fixed-size targets.
#[derive(Clone, Copy)]
struct ZeroDeserializer {
    max_depth: usize,
    depth: usize,
}

impl ZeroDeserializer {
    fn nested(self) -> Result<Self> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded(self.max_depth));
        }
        Ok(ZeroDeserializer {
            max_depth: self.max_depth,
            depth: self.depth + 1,
        })
    }
}

macro_rules! deserialize_zero {
    ($($method:ident => $visit:ident($zero:expr)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                visitor.$visit($zero)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ZeroDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    deserialize_zero! {
        deserialize_bool => visit_bool(false),
        deserialize_i8 => visit_i8(0),
        deserialize_i16 => visit_i16(0),
        deserialize_i32 => visit_i32(0),
        deserialize_i64 => visit_i64(0),
        deserialize_i128 => visit_i128(0),
        deserialize_u8 => visit_u8(0),
        deserialize_u16 => visit_u16(0),
        deserialize_u32 => visit_u32(0),
        deserialize_u64 => visit_u64(0),
        deserialize_u128 => visit_u128(0),
        deserialize_f32 => visit_f32(0.0),
        deserialize_f64 => visit_f64(0.0),
        deserialize_char => visit_char('\0'),
        deserialize_str => visit_str(""),
        deserialize_string => visit_str(""),
        deserialize_identifier => visit_str(""),
        deserialize_bytes => visit_bytes(&[]),
        deserialize_byte_buf => visit_bytes(&[]),
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_none()
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(0, visitor)
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let zero = if len == 0 { self } else { self.nested()? };
        visitor.visit_seq(ZeroElements {
            remaining: len,
            zero,
        })
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_struct("", &[], visitor)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let zero = if fields.is_empty() { self } else { self.nested()? };
        visitor.visit_map(ZeroFields { fields, zero })
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::unsupported_type(&format!("enum {} has no zero value", name)))
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct ZeroElements {
    remaining: usize,
    zero: ZeroDeserializer,
}

impl<'de> de::SeqAccess<'de> for ZeroElements {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(self.zero).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Every field of a record paired with a zero value.
struct ZeroFields {
    fields: &'static [&'static str],
    zero: ZeroDeserializer,
}

impl<'de> de::MapAccess<'de> for ZeroFields {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some((field, rest)) = self.fields.split_first() else {
            return Ok(None);
        };
        self.fields = rest;
        let field: de::value::StrDeserializer<Error> = field.into_deserializer();
        seed.deserialize(field).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.zero)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}
