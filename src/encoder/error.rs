//! Form validation errors

use super::form::FormField;
use thiserror::Error;

/// Errors that stop a form from being encoded
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// One or more required answers are empty
    #[error("Missing required field(s): {}", join_fields(.0))]
    MissingField(Vec<FormField>),

    /// A numeric answer is not a finite number
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: FormField, value: String },

    /// A categorical answer is outside its domain
    #[error("Unknown value for {field}: {value:?} (expected one of: {})", .field.choices().join(", "))]
    UnknownValue { field: FormField, value: String },
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}
