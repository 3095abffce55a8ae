use thiserror::Error;

use crate::tuple::schema::Type;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid schema: {0}")]
    Schema(String),

    #[error("Index {index} is out of range for {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Type mismatch at field {index}: expected {expected}, got {actual}")]
    TypeMismatch {
        index: usize,
        expected: Type,
        actual: Type,
    },

    #[error("Cannot compare {left} with {right}")]
    Incomparable { left: Type, right: Type },

    #[error("No field named '{0}'")]
    NotFound(String),

    #[error("Value of length {len} exceeds maximum length {max_len}")]
    ValueTooLong { len: usize, max_len: usize },

    #[error("Cannot parse '{text}' as {expected}")]
    InvalidValue { text: String, expected: String },

    #[error("Table with name {0} already exists")]
    TableExists(String),
}

pub type Result<T> = std::result::Result<T, Error>;
