//! Error taxonomy for KML parsing
//!
//! Two classes: fatal errors abort the parse and no partial tree is returned,
//! recoverable errors are logged, collected as diagnostics and parsing continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KmlError {
    /// The tokenizer rejected the input as XML
    #[error("malformed markup at byte {position}: {message}")]
    MalformedMarkup { position: usize, message: String },

    /// A closing tag without a matching open, or input ending with open elements
    #[error("unbalanced markup: expected closing tag for {expected:?}, found {found:?}")]
    UnbalancedMarkup {
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("invalid color {0:?}: expected 8 hex digits in aabbggrr order")]
    InvalidColorFormat(String),

    #[error("invalid boolean flag {0:?}")]
    InvalidBooleanFormat(String),

    #[error("invalid coordinate tuple {0:?}")]
    InvalidCoordinate(String),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("style reference {0:?} does not resolve to any style in scope")]
    UnresolvedStyleReference(String),

    #[error("failed to read KML input: {0}")]
    Io(#[from] std::io::Error),
}

impl KmlError {
    /// Whether this error aborts the whole document
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            KmlError::MalformedMarkup { .. } | KmlError::UnbalancedMarkup { .. } | KmlError::Io(_)
        )
    }
}
