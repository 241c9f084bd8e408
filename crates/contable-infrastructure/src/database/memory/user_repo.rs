use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use contable_core::domain::{NewUser, User};
use contable_core::error::DomainError;
use contable_core::repositories::UserRepository;

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, User>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.username == user.username) {
            return Err(DomainError::DatabaseError(format!(
                "duplicate username: {}",
                user.username
            )));
        }
        table.next_id += 1;
        let stored = user.clone().into_user(table.next_id);
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn count(&self) -> Result<i64, DomainError> {
        Ok(self.table.read().await.rows.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.into(),
            password_hash: "$argon2id$placeholder".into(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(&new_user("contador")).await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.find_by_username("contador").await.unwrap(), Some(user));
        assert!(repo.find_by_username("otro").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert(&new_user("contador")).await.unwrap();
        assert!(repo.insert(&new_user("contador")).await.is_err());
    }
}
