// ============================================================================
// Contable Core - Authentication Service
// File: crates/contable-core/src/services/auth_service.rs
// ============================================================================
//! Credential check and access-token issuing

use std::sync::Arc;
use tracing::{info, warn};

use contable_security::{JwtService, PasswordService};

use crate::domain::NewUser;
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// Result of successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub access_token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { user_repo, jwt }
    }

    /// Login with username and password. Unknown user and wrong password
    /// produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, DomainError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown username: {}", username);
                DomainError::InvalidCredentials
            })?;

        let password_valid = PasswordService::verify(password, &user.password_hash)
            .map_err(|e| {
                warn!("Login failed: stored hash unreadable for {}: {}", username, e);
                DomainError::InvalidCredentials
            })?;

        if !password_valid {
            warn!("Login failed: invalid password for: {}", username);
            return Err(DomainError::InvalidCredentials);
        }

        let access_token = self
            .jwt
            .generate_access_token(user.id, &user.username)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        info!("Login successful for: {}", username);
        Ok(LoginResult {
            access_token,
            expires_in: self.jwt.access_token_expiry(),
        })
    }

    /// Inserts the bootstrap user when no user exists yet.
    /// Returns `true` when a user was created.
    pub async fn ensure_bootstrap_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, DomainError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DomainError::ValidationError(
                "bootstrap username and password must not be empty".into(),
            ));
        }

        if self.user_repo.count().await? > 0 {
            return Ok(false);
        }

        let password_hash = PasswordService::hash(password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        let user = self
            .user_repo
            .insert(&NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        info!("Bootstrap user created: id={} username={}", user.id, user.username);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::repositories::MockUserRepository;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn jwt() -> Arc<JwtService> {
        Arc::new(JwtService::new(SECRET, "sistema-contable", "contable-api", 900))
    }

    fn stored_user(password: &str) -> User {
        User {
            id: 1,
            username: "contador".into(),
            password_hash: PasswordService::hash(password).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_valid_token() {
        let user = stored_user("s3creta");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .withf(|u| u == "contador")
            .returning(move |_| Ok(Some(user.clone())));

        let jwt = jwt();
        let service = AuthService::new(Arc::new(repo), jwt.clone());
        let result = service.login("contador", "s3creta").await.unwrap();

        assert_eq!(result.expires_in, 900);
        let claims = jwt.validate_token(&result.access_token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.username, "contador");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("s3creta");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(repo), jwt());
        assert!(matches!(
            service.login("contador", "otra").await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repo), jwt());
        assert!(matches!(
            service.login("nadie", "x").await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_skipped_when_users_exist() {
        let mut repo = MockUserRepository::new();
        repo.expect_count().returning(|| Ok(1));
        repo.expect_insert().never();

        let service = AuthService::new(Arc::new(repo), jwt());
        assert!(!service.ensure_bootstrap_user("admin", "admin").await.unwrap());
    }

    #[tokio::test]
    async fn test_bootstrap_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_count().returning(|| Ok(0));
        repo.expect_insert()
            .withf(|u| {
                u.username == "admin"
                    && PasswordService::verify("cambiar", &u.password_hash).unwrap_or(false)
            })
            .times(1)
            .returning(|u| Ok(u.clone().into_user(1)));

        let service = AuthService::new(Arc::new(repo), jwt());
        assert!(service.ensure_bootstrap_user("admin", "cambiar").await.unwrap());
    }
}
