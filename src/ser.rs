//! Tnetstring serialization.
//!
//! This module provides the [`Serializer`] that writes Rust values implementing
//! `Serialize` as tnetstring frames to any [`io::Write`] sink.
//!
//! ## Overview
//!
//! Scalars are framed directly. Composite values (lists, dictionaries,
//! records) need their payload length before the payload can be written, so
//! each one is first encoded into its own scratch buffer:
//!
//! - **Sequences** become `]` frames, except non-empty sequences of `u8`,
//!   which become `,` byte strings. An empty `Vec<u8>` has no element to
//!   inspect and encodes as `0:]`; annotate the field with
//!   `#[serde(with = "serde_bytes")]` (or use `serde_bytes::ByteBuf`) to get `0:,`
//! - **Maps** become `}` frames with keys written in sorted order, so equal
//!   maps always produce identical bytes
//! - **Structs** become `}` frames with fields in declaration order
//! - **Options** are transparent: `Some(v)` encodes `v`, `None` encodes `0:~`
//!
//! ## Usage
//!
//! ```rust
//! use serde_tnetstring::to_vec;
//! use std::collections::HashMap;
//!
//! let mut map = HashMap::new();
//! map.insert("foo", None);
//! map.insert("bar", Some(1));
//!
//! assert_eq!(to_vec(&map).unwrap(), b"19:3:bar,1:1#3:foo,0:~}");
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_tnetstring::Serializer;
//! use serde::Serialize;
//!
//! let mut serializer = Serializer::new(Vec::new());
//! vec!["foo", "bar"].serialize(&mut serializer).unwrap();
//! true.serialize(&mut serializer).unwrap();
//!
//! assert_eq!(serializer.into_inner(), b"12:3:foo,3:bar,]4:true!");
//! ```

use crate::frame::{self, Tag};
use crate::{Error, Result, TnetOptions};
use serde::ser::{self, Impossible, Serialize};
use std::io;
use std::mem;

/// The tnetstring serializer.
///
/// Every top-level `serialize` call appends exactly one frame to the writer.
pub struct Serializer<W> {
    writer: W,
    options: TnetOptions,
    depth: usize,
}

impl<W: io::Write> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, TnetOptions::default())
    }

    pub fn with_options(writer: W, options: TnetOptions) -> Self {
        Serializer {
            writer,
            options,
            depth: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Creates the scratch serializer for a payload `levels` frames below this one.
    fn nested(&self, levels: usize) -> Result<Serializer<Vec<u8>>> {
        let depth = self.depth + levels;
        if depth > self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }
        Ok(Serializer {
            writer: Vec::new(),
            options: self.options,
            depth,
        })
    }

    #[inline]
    fn write(&mut self, tag: Tag, payload: &[u8]) -> Result<()> {
        frame::write_frame(&mut self.writer, tag, payload)
    }

    /// Writes a finished composite payload, wrapping it as `{variant: payload}`
    /// when it belongs to an enum variant.
    fn emit(&mut self, variant: Option<&'static str>, tag: Tag, payload: &[u8]) -> Result<()> {
        match variant {
            None => self.write(tag, payload),
            Some(name) => {
                let mut body = Vec::with_capacity(name.len() + payload.len() + 24);
                frame::write_frame(&mut body, Tag::String, name.as_bytes())?;
                frame::write_frame(&mut body, tag, payload)?;
                self.write(Tag::Dictionary, &body)
            }
        }
    }

    fn write_integer<T: ToString>(&mut self, v: T) -> Result<()> {
        self.write(Tag::Integer, v.to_string().as_bytes())
    }
}

impl<'a, W: io::Write> ser::Serializer for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a, W>;
    type SerializeTuple = SeqSerializer<'a, W>;
    type SerializeTupleStruct = SeqSerializer<'a, W>;
    type SerializeTupleVariant = SeqSerializer<'a, W>;
    type SerializeMap = MapSerializer<'a, W>;
    type SerializeStruct = StructSerializer<'a, W>;
    type SerializeStructVariant = StructSerializer<'a, W>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        let literal: &[u8] = if v { b"true" } else { b"false" };
        self.write(Tag::Boolean, literal)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        if !v.is_finite() {
            return Err(Error::NonFiniteFloat(v));
        }
        self.write(Tag::Float, format!("{:.6}", v).as_bytes())
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.write(Tag::String, v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.write(Tag::String, v)
    }

    fn serialize_none(self) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.write(Tag::Null, b"")
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let mut body = self.nested(1)?;
        frame::write_frame(&mut body.writer, Tag::String, variant.as_bytes())?;
        value.serialize(&mut body)?;
        self.write(Tag::Dictionary, &body.writer)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        SeqSerializer::new(self, None)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        SeqSerializer::new(self, None)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        SeqSerializer::new(self, None)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        SeqSerializer::new(self, Some(variant))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        let value = self.nested(1)?;
        Ok(MapSerializer {
            ser: self,
            entries: Vec::with_capacity(len.unwrap_or(0).min(1024)),
            key: None,
            value,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        StructSerializer::new(self, None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        StructSerializer::new(self, Some(variant))
    }
}

/// Serializes sequences, tuples and tuple variants into a `]` frame.
pub struct SeqSerializer<'a, W> {
    ser: &'a mut Serializer<W>,
    scratch: Serializer<Vec<u8>>,
    // Raw bytes collected while every element so far has been a `u8`.
    bytes: Option<Vec<u8>>,
    variant: Option<&'static str>,
}

impl<'a, W: io::Write> SeqSerializer<'a, W> {
    fn new(ser: &'a mut Serializer<W>, variant: Option<&'static str>) -> Result<Self> {
        let levels = if variant.is_some() { 2 } else { 1 };
        let scratch = ser.nested(levels)?;
        let bytes = ser.options.bytes_as_strings.then(Vec::new);
        Ok(SeqSerializer {
            ser,
            scratch,
            bytes,
            variant,
        })
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(bytes) = &mut self.bytes {
            match value.serialize(ScalarProbe) {
                Ok(Scalar::Byte(b)) => bytes.push(b),
                _ => self.bytes = None,
            }
        }
        value.serialize(&mut self.scratch)
    }

    fn finish(self) -> Result<()> {
        match self.bytes {
            Some(bytes) if !bytes.is_empty() => self.ser.emit(self.variant, Tag::String, &bytes),
            _ => self
                .ser
                .emit(self.variant, Tag::List, &self.scratch.writer),
        }
    }
}

impl<'a, W: io::Write> ser::SerializeSeq for SeqSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: io::Write> ser::SerializeTuple for SeqSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: io::Write> ser::SerializeTupleStruct for SeqSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: io::Write> ser::SerializeTupleVariant for SeqSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

/// Serializes maps into a `}` frame with keys in sorted order.
pub struct MapSerializer<'a, W> {
    ser: &'a mut Serializer<W>,
    entries: Vec<(String, Vec<u8>)>,
    key: Option<String>,
    value: Serializer<Vec<u8>>,
}

impl<'a, W: io::Write> ser::SerializeMap for MapSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ScalarProbe)? {
            Scalar::Text(s) => {
                self.key = Some(s);
                Ok(())
            }
            Scalar::Byte(_) => Err(Error::NonStringKey),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        value.serialize(&mut self.value)?;
        self.entries.push((key, mem::take(&mut self.value.writer)));
        Ok(())
    }

    fn end(mut self) -> Result<()> {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));

        let len = self
            .entries
            .iter()
            .map(|(k, v)| k.len() + v.len() + 12)
            .sum();
        let mut payload = Vec::with_capacity(len);
        for (key, value) in &self.entries {
            frame::write_frame(&mut payload, Tag::String, key.as_bytes())?;
            payload.extend_from_slice(value);
        }
        self.ser.write(Tag::Dictionary, &payload)
    }
}

/// Serializes structs and struct variants into a `}` frame in declaration order.
pub struct StructSerializer<'a, W> {
    ser: &'a mut Serializer<W>,
    scratch: Serializer<Vec<u8>>,
    variant: Option<&'static str>,
}

impl<'a, W: io::Write> StructSerializer<'a, W> {
    fn new(ser: &'a mut Serializer<W>, variant: Option<&'static str>) -> Result<Self> {
        let levels = if variant.is_some() { 2 } else { 1 };
        let scratch = ser.nested(levels)?;
        Ok(StructSerializer {
            ser,
            scratch,
            variant,
        })
    }

    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.scratch.write(Tag::String, key.as_bytes())?;
        value.serialize(&mut self.scratch)
    }
}

impl<'a, W: io::Write> ser::SerializeStruct for StructSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.ser
            .emit(self.variant, Tag::Dictionary, &self.scratch.writer)
    }
}

impl<'a, W: io::Write> ser::SerializeStructVariant for StructSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.ser
            .emit(self.variant, Tag::Dictionary, &self.scratch.writer)
    }
}

/// What [`ScalarProbe`] found.
enum Scalar {
    Text(String),
    Byte(u8),
}

/// Accepts only string-like values and `u8`s.
///
/// Used to validate mapping keys and to detect byte sequences; every other
/// shape fails with [`Error::NonStringKey`].
struct ScalarProbe;

macro_rules! reject {
    ($($method:ident($($arg:ty),*)),* $(,)?) => {
        $(
            fn $method(self, $(_: $arg),*) -> Result<Scalar> {
                Err(Error::NonStringKey)
            }
        )*
    };
}

impl ser::Serializer for ScalarProbe {
    type Ok = Scalar;
    type Error = Error;

    type SerializeSeq = Impossible<Scalar, Error>;
    type SerializeTuple = Impossible<Scalar, Error>;
    type SerializeTupleStruct = Impossible<Scalar, Error>;
    type SerializeTupleVariant = Impossible<Scalar, Error>;
    type SerializeMap = Impossible<Scalar, Error>;
    type SerializeStruct = Impossible<Scalar, Error>;
    type SerializeStructVariant = Impossible<Scalar, Error>;

    fn serialize_str(self, v: &str) -> Result<Scalar> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<Scalar> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Scalar> {
        Ok(Scalar::Byte(v))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Scalar> {
        Ok(Scalar::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Scalar>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    reject! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_bytes(&[u8]),
        serialize_none(),
        serialize_unit(),
        serialize_unit_struct(&'static str),
    }

    fn serialize_some<T>(self, _value: &T) -> Result<Scalar>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::NonStringKey)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Scalar>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::NonStringKey)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::NonStringKey)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::NonStringKey)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::NonStringKey)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::NonStringKey)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::NonStringKey)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::NonStringKey)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::NonStringKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::{BTreeMap, HashMap};

    fn encode<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut serializer = Serializer::new(Vec::new());
        value.serialize(&mut serializer)?;
        Ok(serializer.into_inner())
    }

    fn encode_str<T: ?Sized + Serialize>(value: &T) -> String {
        String::from_utf8(encode(value).unwrap()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encode_str("hello, world"), "12:hello, world,");
        assert_eq!(encode_str("日本語"), "9:日本語,");
        assert_eq!(encode_str(&true), "4:true!");
        assert_eq!(encode_str(&false), "5:false!");
        assert_eq!(encode_str(&1), "1:1#");
        assert_eq!(encode_str(&-1), "2:-1#");
        assert_eq!(encode_str(&u64::MAX), "20:18446744073709551615#");
        assert_eq!(encode_str(&1.0), "8:1.000000^");
        assert_eq!(encode_str(&-0.125f32), "9:-0.125000^");
        assert_eq!(encode_str(&()), "0:~");
        assert_eq!(encode_str(&'x'), "1:x,");
    }

    #[test]
    fn test_options_are_transparent() {
        assert_eq!(encode_str(&None::<i32>), "0:~");
        assert_eq!(encode_str(&Some(1)), "1:1#");
        assert_eq!(encode_str(&Some(Some("a"))), "1:a,");
    }

    #[test]
    fn test_non_finite_float() {
        assert!(matches!(encode(&f64::NAN), Err(Error::NonFiniteFloat(_))));
        assert!(matches!(
            encode(&f32::INFINITY),
            Err(Error::NonFiniteFloat(_))
        ));
    }

    #[test]
    fn test_sequences() {
        assert_eq!(encode_str(&Vec::<String>::new()), "0:]");
        assert_eq!(encode_str(&["foo", "bar", "baz"]), "18:3:foo,3:bar,3:baz,]");
        assert_eq!(encode_str(&(1, "a")), "8:1:1#1:a,]");
    }

    #[test]
    fn test_byte_sequences_are_strings() {
        assert_eq!(encode_str(&vec![b'a', b'b', b'c']), "3:abc,");
        assert_eq!(encode_str(&[b'a', b'b', b'c']), "3:abc,");
        assert_eq!(encode_str(&vec![vec![b'x'], vec![]]), "7:1:x,0:]]");

        let options = TnetOptions::new().with_bytes_as_strings(false);
        let mut serializer = Serializer::with_options(Vec::new(), options);
        vec![1u8, 2].serialize(&mut serializer).unwrap();
        assert_eq!(serializer.into_inner(), b"8:1:1#1:2#]");
    }

    #[test]
    fn test_maps_sort_keys() {
        let mut map = HashMap::new();
        map.insert("foo", None);
        map.insert("bar", Some(1));
        assert_eq!(encode_str(&map), "19:3:bar,1:1#3:foo,0:~}");

        assert_eq!(encode_str(&HashMap::<String, i32>::new()), "0:}");
    }

    #[test]
    fn test_map_keys_must_be_strings() {
        let mut map = BTreeMap::new();
        map.insert(1, "one");
        assert!(matches!(encode(&map), Err(Error::NonStringKey)));

        let mut map = BTreeMap::new();
        map.insert('k', 1);
        assert_eq!(encode_str(&map), "8:1:k,1:1#}");
    }

    #[test]
    fn test_structs_keep_declaration_order() {
        #[derive(Serialize)]
        struct Unordered {
            zeta: i32,
            alpha: i32,
        }

        #[derive(Serialize)]
        struct Empty {}

        assert_eq!(
            encode_str(&Unordered { zeta: 1, alpha: 2 }),
            "23:4:zeta,1:1#5:alpha,1:2#}"
        );
        assert_eq!(encode_str(&Empty {}), "0:}");
    }

    #[test]
    fn test_serde_field_attributes() {
        #[derive(Serialize)]
        struct Tagged {
            #[serde(rename = "myName")]
            field: i32,
            #[serde(skip)]
            _ignored: i32,
            #[serde(skip_serializing_if = "Option::is_none")]
            maybe: Option<i32>,
        }

        let value = Tagged {
            field: 1,
            _ignored: 2,
            maybe: None,
        };
        assert_eq!(encode_str(&value), "13:6:myName,1:1#}");
    }

    #[test]
    fn test_enums() {
        #[derive(Serialize)]
        enum Shape {
            Empty,
            Circle(u32),
            Rect(u32, u32),
            Named { id: u32 },
        }

        assert_eq!(encode_str(&Shape::Empty), "5:Empty,");
        assert_eq!(encode_str(&Shape::Circle(3)), "13:6:Circle,1:3#}");
        assert_eq!(encode_str(&Shape::Rect(1, 2)), "18:4:Rect,8:1:1#1:2#]}");
        assert_eq!(encode_str(&Shape::Named { id: 7 }), "20:5:Named,9:2:id,1:7#}}");
    }

    #[test]
    fn test_depth_limit() {
        let nested = vec![vec![vec![1]]];
        let options = TnetOptions::new().with_max_depth(2);
        let mut serializer = Serializer::with_options(Vec::new(), options);
        assert!(matches!(
            nested.serialize(&mut serializer),
            Err(Error::DepthLimitExceeded(2))
        ));

        let options = TnetOptions::new().with_max_depth(3);
        let mut serializer = Serializer::with_options(Vec::new(), options);
        nested.serialize(&mut serializer).unwrap();
        assert_eq!(serializer.into_inner(), b"10:7:4:1:1#]]]");
    }
}
