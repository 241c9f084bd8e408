//! Application-wide constants

pub const CONFIG_ENV_PREFIX: &str = "CONTABLE";
pub const DEFAULT_APP_ENV: &str = "development";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 3600;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;
pub const MIN_JWT_SECRET_LENGTH: usize = 32;
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
