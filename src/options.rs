//! Configuration options for tnetstring encoding and decoding.
//!
//! The wire format itself has no knobs: every frame is `SIZE:PAYLOAD TAG`.
//! [`TnetOptions`] only bounds resource use and selects how sequences of
//! `u8` are framed.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tnetstring::{to_vec_with_options, TnetOptions};
//!
//! // Frame a Vec<u8> as a list of integers instead of a byte string
//! let options = TnetOptions::new().with_bytes_as_strings(false);
//! let wire = to_vec_with_options(&vec![1u8, 2], options).unwrap();
//! assert_eq!(wire, b"8:1:1#1:2#]");
//! ```
//!
//! `bytes_as_strings` only applies to sequences with at least one element.
//! An empty `Vec<u8>` always encodes as `0:]`. Fields that must stay byte
//! strings when empty should go through `serde_bytes`:
//!
//! ```rust,ignore
//! #[derive(Serialize)]
//! struct Blob {
//!     #[serde(with = "serde_bytes")]
//!     data: Vec<u8>, // vec![] encodes as 0:,
//! }
//! ```

/// Default bound on nested dictionary and list frames.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options shared by the [`Serializer`](crate::Serializer)
/// and [`Deserializer`](crate::Deserializer).
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::TnetOptions;
///
/// let options = TnetOptions::new().with_max_depth(16);
/// assert_eq!(options.max_depth, 16);
/// assert!(options.bytes_as_strings);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TnetOptions {
    /// Maximum number of nested dictionary/list frames before failing with
    /// [`Error::DepthLimitExceeded`](crate::Error::DepthLimitExceeded).
    pub max_depth: usize,
    /// Encode non-empty sequences of `u8` as string frames (`,`) rather than lists.
    pub bytes_as_strings: bool,
}

impl Default for TnetOptions {
    fn default() -> Self {
        TnetOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            bytes_as_strings: true,
        }
    }
}

impl TnetOptions {
    /// Creates default options (depth bound of 128, byte sequences as strings).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nesting bound.
    ///
    /// A depth of `0` admits only scalar frames at the top level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tnetstring::{from_slice_with_options, TnetOptions, Error};
    ///
    /// let options = TnetOptions::new().with_max_depth(0);
    /// let result: Result<Vec<i32>, Error> = from_slice_with_options(b"0:]", options);
    /// assert!(matches!(result, Err(Error::DepthLimitExceeded(0))));
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Chooses whether sequences of `u8` are framed as byte strings.
    #[must_use]
    pub fn with_bytes_as_strings(mut self, enabled: bool) -> Self {
        self.bytes_as_strings = enabled;
        self
    }
}
