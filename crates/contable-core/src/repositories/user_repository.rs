//! User repository trait (port)

use async_trait::async_trait;

use crate::domain::{NewUser, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn insert(&self, user: &NewUser) -> Result<User, DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;
}
