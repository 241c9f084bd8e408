// ============================================================================
// Contable Infrastructure - PostgreSQL User Repository
// File: crates/contable-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::info;

use contable_core::domain::{NewUser, User};
use contable_core::error::DomainError;
use contable_core::repositories::UserRepository;

use crate::database::connection::map_sqlx_error;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("finding user by username", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, DomainError> {
        info!("Creating user: {}", user.username);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("starting user insert", e))?;

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("inserting user", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("committing user insert", e))?;

        Ok(row.into())
    }

    async fn count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("counting users", e))
    }
}
