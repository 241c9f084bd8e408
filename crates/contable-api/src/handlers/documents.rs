// ============================================================================
// Contable API - Document Handlers
// File: crates/contable-api/src/handlers/documents.rs
// ============================================================================
//! CRUD handlers, shared by every document mount point

use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use contable_core::Document;
use contable_security::Claims;

use crate::error::ApiError;
use crate::state::AppState;

/// GET {base}
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.documents.list().await?))
}

/// GET {base}/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.documents.get(id).await?))
}

/// POST {base} - 201 with `Location: {base}/{id}`
pub async fn create_document(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Extension(claims): Extension<Claims>,
    Json(document): Json<Document>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.documents.create(document).await?;
    info!("Document {} created by {}", created.id, claims.username);

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// PUT {base}/{id} - full replace, 204
pub async fn replace_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Json(document): Json<Document>,
) -> Result<StatusCode, ApiError> {
    state.documents.replace(id, document).await?;
    info!("Document {} replaced by {}", id, claims.username);
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE {base}/{id} - 204
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    state.documents.delete(id).await?;
    info!("Document {} deleted by {}", id, claims.username);
    Ok(StatusCode::NO_CONTENT)
}
