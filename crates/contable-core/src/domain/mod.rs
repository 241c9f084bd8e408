//! Domain entities.

pub mod document;
pub mod user;

pub use document::Document;
pub use user::{NewUser, User};
