//! # Contable API
//!
//! HTTP handlers, bearer-token middleware, and the router.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
