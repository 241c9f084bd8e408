//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Document not found: {0}")]
    DocumentNotFound(i32),

    #[error("Path id {path_id} does not match body id {body_id}")]
    IdMismatch { path_id: i32, body_id: i32 },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
