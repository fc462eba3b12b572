//! The document model: a compact, human-friendly structured text format
//! (nested mappings, ordered sequences, quoted/unquoted strings, numbers,
//! booleans, comments) whose numeric leaves delegate to
//! [`crate::convert`].
//!
//! [`Element`] is the lazy, shared-buffer view produced by parsing
//! ([`parse`]/[`parse_sequence`]); [`compose_mapping`]/[`compose_sequence`]
//! are its inverse.

mod composer;
mod element;
mod error;
mod lexer;
mod parser;
mod variant;

pub use composer::{compose_mapping, compose_sequence};
pub use element::{Element, Mapping, Sequence};
pub use error::{DocumentError, ParseError};
pub use variant::Variant;

/// Parses `text` as a top-level mapping (bare `key: value` list or a
/// braced `{ ... }` struct, per spec §4.9).
pub fn parse(text: impl Into<Vec<u8>>, filename: impl Into<String>) -> Result<Mapping, DocumentError> {
    Element::new(text, filename).to_mapping()
}

/// Parses `text` as a top-level sequence (bare value list or a braced
/// `{ ... }` array).
pub fn parse_sequence(
    text: impl Into<Vec<u8>>,
    filename: impl Into<String>,
) -> Result<Sequence, DocumentError> {
    Element::new(text, filename).to_sequence()
}
