//! Error types for codec and conversion operations.

use chrono::format::{ParseError, ParseErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed temporal text: {0}")]
    MalformedText(String),

    #[error("Calendar field out of range: {0}")]
    FieldOutOfRange(String),

    #[error("Unresolved reference zone: {0}")]
    UnresolvedZone(String),

    #[error("Ambiguous civil time: {0}")]
    AmbiguousCivilTime(String),
}

impl CodecError {
    /// Classify a chrono parse failure into the codec's taxonomy.
    ///
    /// Structurally valid text carrying an impossible calendar field
    /// (month 13, day 32, February 30) is a range failure; everything
    /// else, including missing offset information, is malformed text.
    pub(crate) fn from_parse(text: &str, err: ParseError) -> Self {
        match err.kind() {
            ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => {
                CodecError::FieldOutOfRange(format!("'{text}': {err}"))
            }
            _ => CodecError::MalformedText(format!("'{text}': {err}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
