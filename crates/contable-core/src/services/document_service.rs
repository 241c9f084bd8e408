// ============================================================================
// Contable Core - Document Service
// File: crates/contable-core/src/services/document_service.rs
// ============================================================================
//! CRUD over documents, one repository call per operation

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::document::{AMOUNT_INTEGER_DIGITS, AMOUNT_SCALE};
use crate::domain::Document;
use crate::error::DomainError;
use crate::repositories::DocumentRepository;

pub struct DocumentService {
    repo: Arc<dyn DocumentRepository>,
}

impl DocumentService {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Document>, DomainError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<Document, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::DocumentNotFound(id))
    }

    pub async fn create(&self, document: Document) -> Result<Document, DomainError> {
        check_amounts(&document)?;
        let created = self.repo.insert(&document).await?;
        info!("Document created: id={} folio={:?}", created.id, created.folio);
        Ok(created)
    }

    /// Full replace, last writer wins. The id check runs before the store is touched.
    pub async fn replace(&self, id: i32, document: Document) -> Result<(), DomainError> {
        if document.id != id {
            warn!("Replace rejected: path id {} != body id {}", id, document.id);
            return Err(DomainError::IdMismatch {
                path_id: id,
                body_id: document.id,
            });
        }
        check_amounts(&document)?;

        if !self.repo.update(&document).await? {
            return Err(DomainError::DocumentNotFound(id));
        }

        info!("Document replaced: id={}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        if !self.repo.remove(id).await? {
            return Err(DomainError::DocumentNotFound(id));
        }

        info!("Document deleted: id={}", id);
        Ok(())
    }
}

/// Amounts must fit `NUMERIC(18,4)` unchanged; the store would otherwise
/// round them or fail the write.
fn check_amounts(document: &Document) -> Result<(), DomainError> {
    match document.unstorable_amount() {
        None => Ok(()),
        Some(field) => {
            warn!("Document rejected: {} out of range", field);
            Err(DomainError::ValidationError(format!(
                "{} must have at most {} integer digits and {} decimals",
                field, AMOUNT_INTEGER_DIGITS, AMOUNT_SCALE
            )))
        }
    }
}
