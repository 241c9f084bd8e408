//! Document repository trait (port)

use async_trait::async_trait;

use crate::domain::Document;
use crate::error::DomainError;

/// Persistence context for documents.
///
/// Every mutating call commits on its own; there is no transaction spanning
/// two calls. Implementations report an unreachable store as
/// [`DomainError::StoreUnavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// All documents ordered by id.
    async fn list(&self) -> Result<Vec<Document>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Document>, DomainError>;

    /// Stores `document` under a fresh id; the incoming `id` is ignored.
    async fn insert(&self, document: &Document) -> Result<Document, DomainError>;

    /// Replaces every column of the row with `document.id`.
    /// Returns `false` when no such row exists.
    async fn update(&self, document: &Document) -> Result<bool, DomainError>;

    /// Returns `false` when no such row exists.
    async fn remove(&self, id: i32) -> Result<bool, DomainError>;
}
