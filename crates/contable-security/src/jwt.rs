//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use contable_shared::config::JwtSettings;

const LEEWAY_SECONDS: u64 = 60;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates HS256 access tokens.
///
/// Validation always checks signature, expiry, issuer and audience.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    access_token_expiry: i64,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str, issuer: &str, audience: &str, access_token_expiry: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = LEEWAY_SECONDS;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            access_token_expiry,
            validation,
        }
    }

    pub fn from_settings(settings: &JwtSettings) -> Self {
        Self::new(
            &settings.secret,
            &settings.issuer,
            &settings.audience,
            settings.access_token_expiry,
        )
    }

    /// Lifetime of issued access tokens, in seconds.
    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    pub fn generate_access_token(&self, user_id: i32, username: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::ValidationError(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service() -> JwtService {
        JwtService::new(SECRET, "sistema-contable", "contable-api", 3600)
    }

    #[test]
    fn test_generate_and_validate() {
        let jwt = service();
        let token = jwt.generate_access_token(7, "contador").unwrap();
        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "contador");
        assert_eq!(claims.iss, "sistema-contable");
        assert_eq!(claims.aud, "contable-api");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".into(),
            username: "contador".into(),
            iss: "sistema-contable".into(),
            aud: "contable-api".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jwt.sign(&claims).unwrap();
        assert!(matches!(jwt.validate_token(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = JwtService::new(
            "ffffffffffffffffffffffffffffffff",
            "sistema-contable",
            "contable-api",
            3600,
        );
        let token = other.generate_access_token(1, "contador").unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::ValidationError(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let other = JwtService::new(SECRET, "someone-else", "contable-api", 3600);
        let token = other.generate_access_token(1, "contador").unwrap();
        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let other = JwtService::new(SECRET, "sistema-contable", "other-api", 3600);
        let token = other.generate_access_token(1, "contador").unwrap();
        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(service().validate_token("not-a-jwt").is_err());
    }
}
