//! Domain services

pub mod auth_service;
pub mod document_service;

pub use auth_service::{AuthService, LoginResult};
pub use document_service::DocumentService;
