//! Errors raised while reading member directories.

use thiserror::Error;

/// Errors produced by the record readers.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("CSV syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("CSV record on line {line} has {found} fields, expected {expected}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("member {index} field `{field}` is not a scalar value")]
    NonScalar { index: usize, field: String },

    #[error("unsupported input format `{0}`")]
    UnsupportedFormat(String),
}
