//! In-memory repository implementations.
//!
//! Same contract as the PostgreSQL adapters, without a database. Ids start at
//! 1 and are never reused, mirroring a `SERIAL` column.

mod document_repo;
mod user_repo;

pub use document_repo::InMemoryDocumentRepository;
pub use user_repo::InMemoryUserRepository;
