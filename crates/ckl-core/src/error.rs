//! # Error Types
//!
//! Errors raised while constructing core values. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! Reconciliation itself is total and has no error type: malformed input
//! degrades to defaults instead of failing. The errors here only cover
//! explicit construction of identifiers, dates, and custom schemas.

use thiserror::Error;

/// A domain primitive failed validation at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Checklist identifier is empty or contains forbidden characters.
    #[error("invalid checklist id {value:?}: {reason}")]
    InvalidChecklistId {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Field key is empty or contains whitespace.
    #[error("invalid field key {0:?}")]
    InvalidFieldKey(String),

    /// Calendar date is not an ISO `YYYY-MM-DD` string.
    #[error("invalid calendar date {value:?}: expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected value.
        value: String,
    },

    /// Binary answer was neither `Yes` nor `No`.
    #[error("invalid binary answer {0:?}: expected \"Yes\" or \"No\"")]
    InvalidBinaryAnswer(String),

    /// Checklist title is empty after trimming.
    #[error("checklist title must not be empty")]
    EmptyTitle,
}

/// A field schema registry failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The registry has no fields.
    #[error("schema must contain at least one field")]
    Empty,

    /// Field orders are 1-based.
    #[error("field {key} has order 0; orders start at 1")]
    ZeroOrder {
        /// The offending field key.
        key: String,
    },

    /// Two fields share an order number.
    #[error("duplicate field order {order}")]
    DuplicateOrder {
        /// The repeated order.
        order: u32,
    },

    /// Two fields share a key.
    #[error("duplicate field key {key}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// Two fields share a label.
    #[error("duplicate field label {label:?}")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },

    /// A field label is empty.
    #[error("field {key} has an empty label")]
    EmptyLabel {
        /// The offending field key.
        key: String,
    },
}
