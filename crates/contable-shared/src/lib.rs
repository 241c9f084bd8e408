//! # Contable Shared
//!
//! Configuration, telemetry, and constants shared by the Sistema Contable crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;

pub use config::AppConfig;
pub use error::AppError;
