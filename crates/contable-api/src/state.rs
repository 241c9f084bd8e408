use std::sync::Arc;

use contable_core::services::{AuthService, DocumentService};
use contable_security::JwtService;

/// Built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<DocumentService>,
    pub auth: Arc<AuthService>,
    pub jwt: Arc<JwtService>,
}
