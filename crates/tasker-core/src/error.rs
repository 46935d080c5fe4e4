use thiserror::Error;

use crate::validation::Field;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Please fill in all required fields.")]
    MissingFields(Vec<Field>),

    #[error("New password and confirm password do not match.")]
    PasswordMismatch,
}
