//! PostgreSQL repository implementations

pub mod document_repo_impl;
pub mod user_repo_impl;

pub use document_repo_impl::PgDocumentRepository;
pub use user_repo_impl::PgUserRepository;
