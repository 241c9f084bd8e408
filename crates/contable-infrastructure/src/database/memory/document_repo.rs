use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use contable_core::domain::Document;
use contable_core::error::DomainError;
use contable_core::repositories::DocumentRepository;

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Document>,
}

#[derive(Default)]
pub struct InMemoryDocumentRepository {
    table: RwLock<Table>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn list(&self) -> Result<Vec<Document>, DomainError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Document>, DomainError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, document: &Document) -> Result<Document, DomainError> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let stored = document.clone().with_id(table.next_id).normalized();
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, document: &Document) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&document.id) {
            Some(row) => {
                *row = document.clone().normalized();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
