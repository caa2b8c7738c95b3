//! Error types for tnetstring encoding and decoding.
//!
//! Every error is fatal to the current encode or decode call. Errors raised
//! inside a nested frame propagate unchanged through every enclosing frame,
//! so a single malformed inner value invalidates the whole outer value.
//!
//! ## Error Categories
//!
//! - **Framing**: bad size digits, size field too long, input ending inside a frame
//! - **Tags**: unknown trailing type byte, or a tag the target cannot accept
//! - **Payloads**: malformed integer, float or boolean text
//! - **Semantic**: non-string mapping keys, unsupported values, unknown record fields
//!
//! ## Examples
//!
//! ```rust
//! use serde_tnetstring::{from_slice, Error};
//!
//! let result: Result<i32, Error> = from_slice(b"3:abc,");
//! assert!(matches!(result, Err(Error::TypeMismatch { .. })));
//! ```

use crate::frame::Tag;
use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding tnetstrings.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying byte source or sink failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input ended cleanly before the first byte of a frame.
    #[error("end of input")]
    Eof,

    /// The input ended inside a frame whose size promised more data.
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(&'static str),

    /// A byte other than an ASCII digit appeared in the size field.
    #[error("invalid size character {:?}", char::from(*.0))]
    InvalidSizeChar(u8),

    /// No `:` was seen within the maximum number of size digits.
    #[error("size limit exceeded: more than {0} digits before ':'")]
    SizeLimitExceeded(usize),

    /// The trailing type byte is not one of the seven known tags.
    #[error("invalid type tag {:?}", char::from(*.0))]
    InvalidTag(u8),

    /// The tag is valid but the requested target cannot accept it.
    #[error("type mismatch: tag {tag} cannot decode into {expected}")]
    TypeMismatch { tag: Tag, expected: &'static str },

    /// An integer payload is malformed or out of range for the target.
    #[error("invalid integer {0:?}")]
    InvalidInteger(String),

    /// A float payload is malformed.
    #[error("invalid float {0:?}")]
    InvalidFloat(String),

    /// A boolean payload is neither `true` nor `false`.
    #[error("invalid boolean {0:?}")]
    InvalidBool(String),

    /// A string payload is not valid UTF-8 but the target requires text.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// A dictionary key names no field of the target record.
    #[error("unknown field {field:?}, expected one of {expected:?}")]
    UnknownField {
        field: String,
        expected: &'static [&'static str],
    },

    /// A mapping key did not serialize as a string.
    #[error("non string key")]
    NonStringKey,

    /// The value has no defined wire mapping.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// NaN and infinities have no decimal fixed-point form.
    #[error("non-finite float {0} cannot be encoded")]
    NonFiniteFloat(f64),

    /// Nesting went deeper than the configured bound.
    #[error("too deeply nested: depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),

    /// Bytes remained after the single expected frame.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// Custom error raised by a `Serialize` or `Deserialize` impl.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a type mismatch error for `tag` decoded into a target of shape `expected`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tnetstring::{Error, Tag};
    ///
    /// let err = Error::type_mismatch(Tag::String, "i32");
    /// assert_eq!(err.to_string(), "type mismatch: tag ',' cannot decode into i32");
    /// ```
    pub fn type_mismatch(tag: Tag, expected: &'static str) -> Self {
        Error::TypeMismatch { tag, expected }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tnetstring::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` for the clean end-of-input condition, as opposed to a truncated frame.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Eof)
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    fn unknown_field(field: &str, expected: &'static [&'static str]) -> Self {
        Error::UnknownField {
            field: field.to_string(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
