use serde::Serialize;
use thiserror::Error;

/// A structured parse failure with the byte offset of the offending input.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    #[must_use]
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}
