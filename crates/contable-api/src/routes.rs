//! Router assembly

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::warn;

use crate::handlers::{auth, documents, health};
use crate::middleware::require_bearer;
use crate::state::AppState;

/// Mount points for the document routes. `/api/taxdocuments` serves the same
/// handlers for clients of the former TaxDocument API.
pub const DOCUMENT_BASES: [&str; 2] = ["/api/document", "/api/taxdocuments"];

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    // Every document route requires a bearer token, reads included.
    let mut protected_routes = Router::new();
    for base in DOCUMENT_BASES {
        protected_routes = protected_routes
            .route(
                base,
                get(documents::list_documents).post(documents::create_document),
            )
            .route(
                &format!("{}/{{id}}", base),
                get(documents::get_document)
                    .put(documents::replace_document)
                    .delete(documents::delete_document),
            );
    }
    let protected_routes = protected_routes
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/login", post(auth::login));

    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    match cors_layer(allowed_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .expose_headers([header::LOCATION]),
    )
}
