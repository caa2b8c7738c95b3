//! Field directives for records.
//!
//! A record field may carry a directive string controlling how it appears
//! inside the record's dictionary frame:
//!
//! | Directive            | Effect                                            |
//! |----------------------|---------------------------------------------------|
//! | *(none)*             | key is the field name, always written             |
//! | `"name"`             | key is `name`                                     |
//! | `"name,omitempty"`   | key is `name`, skipped while the field is zero    |
//! | `",omitempty"`       | key is the field name, skipped while zero         |
//! | `"-"`                | field is never written and never accepted         |
//! | `"-,"`               | key is literally `-`                              |
//!
//! The directives of one record type are parsed once into a [`FieldTags`]
//! table. The encoder walks it in declaration order and the decoder resolves
//! incoming keys through it, so both directions agree on every name.
//! The [`record!`](crate::record) macro builds the table and the serde impls
//! that consult it.
//!
//! ```rust
//! use serde_tnetstring::{FieldTag, FieldTags};
//!
//! let tags = FieldTags::new(vec![
//!     FieldTag::parse("id", None),
//!     FieldTag::parse("secret", Some("-")),
//!     FieldTag::parse("nick", Some("nickname,omitempty")),
//! ]);
//! assert_eq!(tags.names(), &["id", "nickname"]);
//! assert_eq!(tags.resolve("nickname"), Some(2));
//! assert_eq!(tags.resolve("secret"), None);
//! ```

use std::ops::Index;

const OMIT_EMPTY: &str = "omitempty";

/// Returns `true` if `value` equals its type's zero value.
pub fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// The parsed directive of a single record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldTag {
    name: &'static str,
    display_name: &'static str,
    omit_empty: bool,
    excluded: bool,
}

impl FieldTag {
    /// Parses the directive attached to field `name`.
    ///
    /// ```rust
    /// use serde_tnetstring::FieldTag;
    ///
    /// let tag = FieldTag::parse("Field", Some(",omitempty"));
    /// assert_eq!(tag.display_name(), "Field");
    /// assert!(tag.omit_empty());
    ///
    /// assert!(FieldTag::parse("Field", Some("-")).is_excluded());
    /// assert_eq!(FieldTag::parse("Field", Some("-,")).display_name(), "-");
    /// ```
    #[must_use]
    pub fn parse(name: &'static str, directive: Option<&'static str>) -> Self {
        let mut tag = FieldTag {
            name,
            display_name: name,
            omit_empty: false,
            excluded: false,
        };
        let Some(directive) = directive else {
            return tag;
        };
        if directive == "-" {
            tag.excluded = true;
            return tag;
        }

        let mut parts = directive.split(',');
        if let Some(display_name) = parts.next().filter(|s| !s.is_empty()) {
            tag.display_name = display_name;
        }
        tag.omit_empty = parts.any(|option| option == OMIT_EMPTY);
        tag
    }

    /// The field's declared name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The dictionary key this field is written under.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    #[must_use]
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Decides whether a field currently holding `value` is written.
    pub fn includes<T: Default + PartialEq>(&self, value: &T) -> bool {
        !self.excluded && !(self.omit_empty && is_zero(value))
    }
}

/// The per-type descriptor table of a record, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldTags {
    tags: Vec<FieldTag>,
    names: Vec<&'static str>,
}

impl FieldTags {
    #[must_use]
    pub fn new(tags: Vec<FieldTag>) -> Self {
        let names = tags
            .iter()
            .filter(|tag| !tag.excluded)
            .map(|tag| tag.display_name)
            .collect();
        FieldTags { tags, names }
    }

    /// Maps a dictionary key to the index of the field that accepts it.
    ///
    /// Excluded fields never match.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<usize> {
        self.tags
            .iter()
            .position(|tag| !tag.excluded && tag.display_name == key)
    }

    /// Display names of every non-excluded field, in declaration order.
    #[must_use]
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldTag> {
        self.tags.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Index<usize> for FieldTags {
    type Output = FieldTag;

    fn index(&self, index: usize) -> &FieldTag {
        &self.tags[index]
    }
}

/// A struct whose wire layout is described by a [`FieldTags`] table.
///
/// Implemented by [`record!`](crate::record).
pub trait Record {
    fn field_tags() -> &'static FieldTags;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directives() {
        let plain = FieldTag::parse("NoTag", None);
        assert_eq!(plain.display_name(), "NoTag");
        assert!(!plain.omit_empty() && !plain.is_excluded());

        let named = FieldTag::parse("Named", Some("foo"));
        assert_eq!(named.name(), "Named");
        assert_eq!(named.display_name(), "foo");
        assert!(!named.omit_empty());

        let both = FieldTag::parse("NamedOmitEmpty", Some("bar,omitempty"));
        assert_eq!(both.display_name(), "bar");
        assert!(both.omit_empty());

        let empty = FieldTag::parse("Empty", Some(""));
        assert_eq!(empty.display_name(), "Empty");
    }

    #[test]
    fn test_unknown_options_are_ignored() {
        let tag = FieldTag::parse("f", Some("g,string,omitempty"));
        assert_eq!(tag.display_name(), "g");
        assert!(tag.omit_empty());

        let tag = FieldTag::parse("f", Some("g,string"));
        assert!(!tag.omit_empty());
    }

    #[test]
    fn test_includes() {
        let omit = FieldTag::parse("n", Some(",omitempty"));
        assert!(!omit.includes(&0i32));
        assert!(omit.includes(&1i32));
        assert!(!omit.includes(&None::<i32>));
        assert!(omit.includes(&Some(0i32)));
        assert!(!omit.includes(&String::new()));

        let excluded = FieldTag::parse("n", Some("-"));
        assert!(!excluded.includes(&1i32));

        let plain = FieldTag::parse("n", None);
        assert!(plain.includes(&0i32));
    }

    #[test]
    fn test_table_resolution() {
        let tags = FieldTags::new(vec![
            FieldTag::parse("a", None),
            FieldTag::parse("b", Some("-")),
            FieldTag::parse("c", Some("b")),
        ]);
        assert_eq!(tags.len(), 3);
        assert_eq!(tags.resolve("a"), Some(0));
        // The key "b" belongs to the renamed field, not the excluded one.
        assert_eq!(tags.resolve("b"), Some(2));
        assert_eq!(tags.resolve("c"), None);
        assert_eq!(tags.names(), &["a", "b"]);
        assert_eq!(tags[2].name(), "c");
    }
}
