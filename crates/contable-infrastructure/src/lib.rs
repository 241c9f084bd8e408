//! # Contable Infrastructure
//!
//! Database adapters for the repository traits in `contable-core`.

pub mod database;

pub use database::{
    create_pool, run_migrations, InMemoryDocumentRepository, InMemoryUserRepository,
    PgDocumentRepository, PgUserRepository,
};
