//! Shared error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Unknown provider: {input}")]
    UnknownProvider { input: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
