//! Status-check endpoints backed by SQLite.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{Extension, Json};
use std::sync::Arc;
use visio_db::{insert_status_check, list_status_checks, MAX_STATUS_CHECKS};
use visio_types::{StatusCheck, StatusCheckCreate};

/// Handler for `POST /api/status`.
pub async fn create_status_check_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<StatusCheckCreate>,
) -> Result<Json<StatusCheck>, ApiError> {
    let check = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::InternalServerError(format!("db connection failed: {}", e)))?;
        insert_status_check(&conn, &payload.client_name).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("task join error: {}", e)))??;

    Ok(Json(check))
}

/// Handler for `GET /api/status`.
pub async fn list_status_checks_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<StatusCheck>>, ApiError> {
    let checks = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::InternalServerError(format!("db connection failed: {}", e)))?;
        list_status_checks(&conn, MAX_STATUS_CHECKS).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("task join error: {}", e)))??;

    Ok(Json(checks))
}
