//! Repository traits (ports)

pub mod document_repository;
pub mod user_repository;

pub use document_repository::DocumentRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use document_repository::MockDocumentRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
