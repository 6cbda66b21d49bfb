//! Crate-wide error type for the data model layer.
//!
//! Every other crate defines its own `thiserror` enum for its own failure
//! modes (`CacheError`, `DecodeError`, `SimError`, ...); this one covers
//! failures that can occur while constructing or validating the shared
//! types themselves.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbError {
    #[error("value out of range: {field} = {value} not in [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("invalid pubkey length: expected 32 bytes, got {len}")]
    InvalidPubkeyLength { len: usize },

    #[error("math overflow in '{operation}'")]
    MathOverflow { operation: String },

    #[error("division by zero in '{context}'")]
    DivisionByZero { context: String },
}

impl ArbError {
    pub fn out_of_range(field: &str, value: impl ToString, min: impl ToString, max: impl ToString) -> Self {
        Self::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn math_overflow(operation: &str) -> Self {
        Self::MathOverflow {
            operation: operation.to_string(),
        }
    }

    pub fn division_by_zero(context: &str) -> Self {
        Self::DivisionByZero {
            context: context.to_string(),
        }
    }
}
