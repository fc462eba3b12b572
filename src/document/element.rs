//! [`Element`]: a lazily-interpreted view over a shared, immutable text
//! buffer (spec §4.9/§5 "resource lifecycle").
//!
//! An `Element` is either undefined (no backing text — the result of
//! looking up a missing key) or a byte range into a source buffer shared
//! (via [`Arc`]) with every other `Element` carved from the same
//! [`crate::document::parse`] call. Carving a child range never copies the
//! underlying bytes.

use std::ops::Range;
use std::sync::Arc;

use super::error::{DocumentError, ParseError};
use indexmap::IndexMap;

#[derive(Debug)]
pub(crate) struct SourceText {
    pub(crate) text: Vec<u8>,
    pub(crate) filename: String,
}

/// An ordered mapping from byte-string keys to child elements. Ordered so
/// that composition round-trips insertion order (spec §5 "ordering").
pub type Mapping = IndexMap<Vec<u8>, Element>;

/// An ordered sequence of child elements.
pub type Sequence = Vec<Element>;

/// A view into a shared source buffer: either a defined byte range, or
/// "undefined" (no backing text at all).
#[derive(Clone, Debug)]
pub struct Element {
    inner: Option<(Arc<SourceText>, Range<usize>)>,
}

impl Element {
    /// Builds a root element spanning the whole of `text`.
    pub fn new(text: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.len();
        let filename = filename.into();
        Element {
            inner: Some((Arc::new(SourceText { text, filename }), 0..len)),
        }
    }

    /// The undefined element: carries no text, every query fails with
    /// [`DocumentError::UndefinedElement`].
    pub fn undefined() -> Self {
        Element { inner: None }
    }

    /// Builds a child view sharing `self`'s buffer, covering `range`
    /// (absolute byte offsets into that shared buffer).
    pub(crate) fn child(&self, range: Range<usize>) -> Self {
        let (source, _) = self.inner.as_ref().expect("child() of an undefined element");
        Element {
            inner: Some((Arc::clone(source), range)),
        }
    }

    pub fn exists(&self) -> bool {
        self.inner.is_some()
    }

    pub(crate) fn source(&self) -> Option<&Arc<SourceText>> {
        self.inner.as_ref().map(|(s, _)| s)
    }

    pub(crate) fn range(&self) -> Option<Range<usize>> {
        self.inner.as_ref().map(|(_, r)| r.clone())
    }

    /// The raw bytes of this element's span.
    pub fn bytes(&self) -> Result<&[u8], DocumentError> {
        let (source, range) = self.inner.as_ref().ok_or(DocumentError::UndefinedElement)?;
        Ok(&source.text[range.clone()])
    }

    /// Same as [`Element::bytes`], but returns `default` instead of an
    /// error for an undefined element.
    pub fn optional_bytes<'a>(&'a self, default: &'a [u8]) -> &'a [u8] {
        self.bytes().unwrap_or(default)
    }

    pub fn filename(&self) -> &str {
        self.inner.as_ref().map(|(s, _)| s.filename.as_str()).unwrap_or("")
    }

    /// 1-based `(line, column)` for an absolute byte offset into the
    /// shared buffer (spec §6 "error reporting").
    pub fn line_and_column(&self, absolute_offset: usize) -> (usize, usize) {
        let source = self.source().expect("line_and_column() of an undefined element");
        let mut line = 1usize;
        let mut column = 1usize;
        for &b in &source.text[..absolute_offset.min(source.text.len())] {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    pub(crate) fn parse_error_at(&self, absolute_offset: usize) -> ParseError {
        let (line, column) = self.line_and_column(absolute_offset);
        ParseError {
            filename: self.filename().to_string(),
            offset: absolute_offset,
            line,
            column,
        }
    }

    fn checked(&self) -> Result<(), DocumentError> {
        if self.exists() {
            Ok(())
        } else {
            Err(DocumentError::UndefinedElement)
        }
    }

    /// Interprets this element as a `{ key: value, ... }` mapping.
    pub fn to_mapping(&self) -> Result<Mapping, DocumentError> {
        self.checked()?;
        super::parser::try_parse_mapping(self)
    }

    /// Interprets this element as a `{ a, b, c }` sequence.
    pub fn to_sequence(&self) -> Result<Sequence, DocumentError> {
        self.checked()?;
        super::parser::try_parse_sequence(self)
    }

    /// Classifies this element into whichever [`super::Variant`] kind its
    /// leading byte suggests, trying alternatives in a fixed order.
    pub fn to_variant(&self) -> Result<super::Variant, DocumentError> {
        self.checked()?;
        super::parser::try_parse_variant(self)
    }

    pub fn to_text(&self) -> Result<Vec<u8>, DocumentError> {
        self.checked()?;
        super::parser::try_parse_text(self)
    }

    pub fn to_bool(&self) -> Result<bool, DocumentError> {
        self.checked()?;
        super::parser::try_parse_bool(self)
    }

    pub fn to_f64(&self) -> Result<f64, DocumentError> {
        self.checked()?;
        super::parser::try_parse_real_f64(self)
    }

    pub fn to_f32(&self) -> Result<f32, DocumentError> {
        self.checked()?;
        super::parser::try_parse_real_f32(self)
    }

    pub fn to_i8(&self) -> Result<i8, DocumentError> {
        self.checked()?;
        super::parser::try_parse_i8(self)
    }

    pub fn to_i16(&self) -> Result<i16, DocumentError> {
        self.checked()?;
        super::parser::try_parse_i16(self)
    }

    pub fn to_i32(&self) -> Result<i32, DocumentError> {
        self.checked()?;
        super::parser::try_parse_i32(self)
    }

    pub fn to_i64(&self) -> Result<i64, DocumentError> {
        self.checked()?;
        super::parser::try_parse_i64(self)
    }

    pub fn to_u8(&self) -> Result<u8, DocumentError> {
        self.checked()?;
        super::parser::try_parse_u8(self)
    }

    pub fn to_u16(&self) -> Result<u16, DocumentError> {
        self.checked()?;
        super::parser::try_parse_u16(self)
    }

    pub fn to_u32(&self) -> Result<u32, DocumentError> {
        self.checked()?;
        super::parser::try_parse_u32(self)
    }

    pub fn to_u64(&self) -> Result<u64, DocumentError> {
        self.checked()?;
        super::parser::try_parse_u64(self)
    }

    /// True if this element is nothing but whitespace and comments (or
    /// undefined).
    pub fn is_empty(&self) -> bool {
        if !self.exists() {
            return true;
        }
        super::parser::is_empty(self).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_shares_buffer_and_offsets_are_absolute() {
        let root = Element::new(b"abc{def}".to_vec(), "");
        let child = root.child(4..7);
        assert_eq!(child.bytes().unwrap(), b"def");
    }

    #[test]
    fn undefined_element_reports_error() {
        let e = Element::undefined();
        assert!(!e.exists());
        assert!(matches!(e.bytes(), Err(DocumentError::UndefinedElement)));
    }

    #[test]
    fn line_and_column_counts_newlines() {
        let root = Element::new(b"ab\ncd\nef".to_vec(), "");
        assert_eq!(root.line_and_column(0), (1, 1));
        assert_eq!(root.line_and_column(3), (2, 1));
        assert_eq!(root.line_and_column(7), (3, 2));
    }
}
