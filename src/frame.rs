//! The framing rule shared by the encoder and decoder.
//!
//! A tnetstring has exactly one structural unit, the frame:
//!
//! ```text
//! SIZE ":" PAYLOAD TAG
//! ```
//!
//! - `SIZE` is at most [`MAX_SIZE_DIGITS`] ASCII decimal digits counting the
//!   bytes of `PAYLOAD` (not the colon, not the tag).
//! - `TAG` is a single byte selecting how `PAYLOAD` is read:
//!
//! | Tag | Meaning    | Payload                                   |
//! |-----|------------|-------------------------------------------|
//! | `,` | string     | raw bytes, not escaped                    |
//! | `#` | integer    | `-?[0-9]+`                                |
//! | `^` | float      | decimal text, e.g. `-0.125000`            |
//! | `!` | boolean    | `true` or `false`                         |
//! | `~` | null       | empty (anything present is ignored)       |
//! | `}` | dictionary | alternating key frame, value frame        |
//! | `]` | list       | zero or more value frames                 |
//!
//! ```rust
//! use serde_tnetstring::frame::{read_frame, Tag};
//!
//! let mut input: &[u8] = b"12:3:foo,3:bar,]";
//! let frame = read_frame(&mut input).unwrap().unwrap();
//! assert_eq!(frame.tag, Tag::List);
//! assert_eq!(frame.payload, b"3:foo,3:bar,");
//! assert!(input.is_empty());
//! ```

use crate::{Error, Result};
use log::trace;
use std::fmt;
use std::io::{self, Read, Write};

/// Maximum number of digits accepted in a size field.
pub const MAX_SIZE_DIGITS: usize = 10;

/// Upper bound on the buffer reserved up front for a payload; larger
/// payloads grow as their bytes actually arrive.
const PREALLOC_LIMIT: usize = 64 * 1024;

/// The trailing type byte of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    String,
    Integer,
    Float,
    Boolean,
    Null,
    Dictionary,
    List,
}

impl Tag {
    /// Maps a wire byte to its tag.
    ///
    /// ```rust
    /// use serde_tnetstring::Tag;
    ///
    /// assert_eq!(Tag::from_byte(b'}'), Some(Tag::Dictionary));
    /// assert_eq!(Tag::from_byte(b'x'), None);
    /// ```
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Tag> {
        match byte {
            b',' => Some(Tag::String),
            b'#' => Some(Tag::Integer),
            b'^' => Some(Tag::Float),
            b'!' => Some(Tag::Boolean),
            b'~' => Some(Tag::Null),
            b'}' => Some(Tag::Dictionary),
            b']' => Some(Tag::List),
            _ => None,
        }
    }

    /// The wire byte for this tag.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Tag::String => b',',
            Tag::Integer => b'#',
            Tag::Float => b'^',
            Tag::Boolean => b'!',
            Tag::Null => b'~',
            Tag::Dictionary => b'}',
            Tag::List => b']',
        }
    }

    /// Returns `true` for dictionary and list tags, whose payloads hold nested frames.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Tag::Dictionary | Tag::List)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", char::from(self.as_byte()))
    }
}

/// One complete `SIZE:PAYLOAD TAG` unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub tag: Tag,
    pub payload: Vec<u8>,
}

/// Reads a single byte, distinguishing end of input (`Ok(None)`) from failure.
fn read_byte<R: Read + ?Sized>(reader: &mut R) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
}

/// Reads the size field up to and including its `:`.
///
/// Returns `Ok(None)` if the input is exhausted before the first byte.
///
/// # Errors
///
/// - [`Error::InvalidSizeChar`] for a non-digit byte, or an empty size field
/// - [`Error::SizeLimitExceeded`] if no `:` follows within [`MAX_SIZE_DIGITS`] digits
/// - [`Error::UnexpectedEof`] if the input ends inside the size field
pub fn read_size<R: Read + ?Sized>(reader: &mut R) -> Result<Option<usize>> {
    let mut size: u64 = 0;
    for i in 0..=MAX_SIZE_DIGITS {
        let byte = match read_byte(reader)? {
            Some(byte) => byte,
            None if i == 0 => return Ok(None),
            None => return Err(Error::UnexpectedEof("size field")),
        };
        match byte {
            b':' if i == 0 => return Err(Error::InvalidSizeChar(byte)),
            b':' => {
                return usize::try_from(size)
                    .map(Some)
                    .map_err(|_| Error::SizeLimitExceeded(MAX_SIZE_DIGITS));
            }
            _ if i == MAX_SIZE_DIGITS => return Err(Error::SizeLimitExceeded(MAX_SIZE_DIGITS)),
            b'0'..=b'9' => size = size * 10 + u64::from(byte - b'0'),
            _ => return Err(Error::InvalidSizeChar(byte)),
        }
    }
    Err(Error::SizeLimitExceeded(MAX_SIZE_DIGITS))
}

/// Reads one frame, consuming exactly its bytes from `reader`.
///
/// Returns `Ok(None)` when the input ends cleanly before a new frame starts.
///
/// # Errors
///
/// Fails with the size-field errors of [`read_size`],
/// [`Error::UnexpectedEof`] if fewer than `size + 1` bytes follow the colon,
/// and [`Error::InvalidTag`] if the trailing byte is not a known tag.
pub fn read_frame<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Frame>> {
    let size = match read_size(reader)? {
        Some(size) => size,
        None => return Ok(None),
    };

    let wanted = size as u64 + 1;
    let mut payload = Vec::with_capacity(size.min(PREALLOC_LIMIT) + 1);
    Read::take(&mut *reader, wanted).read_to_end(&mut payload)?;
    if payload.len() as u64 != wanted {
        return Err(Error::UnexpectedEof("payload shorter than declared size"));
    }

    let byte = payload.pop().unwrap_or_default();
    let tag = Tag::from_byte(byte).ok_or(Error::InvalidTag(byte))?;
    trace!("read frame: {} payload bytes, tag {}", size, tag);
    Ok(Some(Frame { tag, payload }))
}

/// Writes `payload` framed with its length and `tag`.
///
/// # Errors
///
/// Propagates any failure of the underlying writer.
pub fn write_frame<W: Write + ?Sized>(writer: &mut W, tag: Tag, payload: &[u8]) -> Result<()> {
    trace!("write frame: {} payload bytes, tag {}", payload.len(), tag);
    write!(writer, "{}:", payload.len())?;
    writer.write_all(payload)?;
    writer.write_all(&[tag.as_byte()])?;
    Ok(())
}

/// Counts the top-level frames in a composite payload by walking size prefixes.
///
/// Tags are not validated and a malformed tail simply ends the count, so the
/// result is only suitable as a capacity hint.
#[must_use]
pub fn count_frames(mut payload: &[u8]) -> usize {
    let mut count = 0;
    while !payload.is_empty() {
        let colon = match payload
            .iter()
            .take(MAX_SIZE_DIGITS + 1)
            .position(|&b| b == b':')
        {
            Some(colon) if colon > 0 => colon,
            _ => break,
        };
        let size = payload[..colon]
            .iter()
            .try_fold(0usize, |acc, &b| match b {
                b'0'..=b'9' => acc.checked_mul(10)?.checked_add(usize::from(b - b'0')),
                _ => None,
            });
        let next = match size.and_then(|size| (colon + 1).checked_add(size)?.checked_add(1)) {
            Some(next) if next <= payload.len() => next,
            _ => break,
        };
        payload = &payload[next..];
        count += 1;
    }
    count
}
