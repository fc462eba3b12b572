//! Error kinds raised by the document model (spec §7).

use thiserror::Error;

/// The input bytes did not conform to the document grammar at a specific
/// byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid document{} at line {line} column {column} (offset {offset})", filename_suffix(&self.filename))]
pub struct ParseError {
    pub filename: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

fn filename_suffix(filename: &str) -> String {
    if filename.is_empty() {
        String::new()
    } else {
        format!(" in {filename}")
    }
}

/// Errors surfaced when interpreting an [`crate::document::Element`] or
/// composing a value back into text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The input text does not conform to the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A caller tried to interpret an `Element` with no backing value
    /// (e.g. a key absent from a mapping).
    #[error("undefined document element")]
    UndefinedElement,
    /// The same as [`DocumentError::UndefinedElement`], but naming the
    /// key that was missing.
    #[error("undefined document element: {0:?}")]
    UndefinedNamedElement(String),
}
