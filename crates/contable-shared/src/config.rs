//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_ACCESS_TOKEN_EXPIRY, DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_APP_ENV,
    MIN_JWT_SECRET_LENGTH,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub log: LogSettings,
    #[serde(default)]
    pub seed: SeedSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

/// Bootstrap user inserted at startup when the users table is empty.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedSettings {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SeedSettings {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Loads defaults, `config/default`, `config/{APP_ENV}` and then
    /// `CONTABLE__SECTION__KEY` environment variables, in that order.
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_APP_ENV.into());
        let config = Self::defaults()?
            .set_default("app.env", env.as_str())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("app.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: AppConfig = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", DEFAULT_APP_ENV)?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "contable-server")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_seconds", DEFAULT_ACQUIRE_TIMEOUT_SECS as i64)?
            .set_default("jwt.issuer", "sistema-contable")?
            .set_default("jwt.audience", "sistema-contable")?
            .set_default("jwt.access_token_expiry", DEFAULT_ACCESS_TOKEN_EXPIRY)?
            .set_default("log.level", "info")?
            .set_default("log.json", true)
    }

    /// Rejects settings the server cannot run with. The JWT secret has no
    /// default and must come from external configuration.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.url.trim().is_empty() {
            return Err(AppError::InvalidConfig("database.url is empty".into()));
        }
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::InvalidConfig(format!(
                "jwt.secret must be at least {} bytes",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if self.jwt.issuer.is_empty() || self.jwt.audience.is_empty() {
            return Err(AppError::InvalidConfig(
                "jwt.issuer and jwt.audience are required".into(),
            ));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(AppError::InvalidConfig(
                "jwt.access_token_expiry must be positive".into(),
            ));
        }
        Ok(())
    }
}
