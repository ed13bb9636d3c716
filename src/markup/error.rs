//! Error types raised while parsing markup sources.

use thiserror::Error;

/// Errors that can occur while building entities from markup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("Entity `{0}` is not supported")]
    InvalidEntityKind(String),

    #[error("Malformed attribute list `{input}`: {reason}")]
    MalformedAttributeList { input: String, reason: &'static str },

    #[error("Malformed tag `{0}`")]
    MalformedTag(String),
}

/// A markup error tied to the source line it occurred on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}")]
pub struct ParseError {
    /// 1-based line number within the chapter source
    pub line: usize,
    #[source]
    pub source: MarkupError,
}

pub type Result<T> = std::result::Result<T, MarkupError>;
