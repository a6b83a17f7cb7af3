//! Route handlers.
//!
//! Handlers authenticate through [`CurrentUser`](crate::identity::CurrentUser),
//! then hand a pooled connection to the case service on the blocking pool.

pub mod cases;
pub mod records;
pub mod workflow;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use rusqlite::Connection;
use serde_json::{Value, json};

use casebook_cases::CaseError;
use casebook_store::StoreError;

use crate::errors::ApiError;
use crate::server::AppState;

/// Run `f` against a pooled connection off the async runtime.
pub(crate) async fn with_conn<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Connection) -> Result<T, CaseError> + Send + 'static,
    T: Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(StoreError::from)?;
        f(&mut *conn).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
}

/// Unwrap a JSON body, turning extractor rejections into 400s.
pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = payload?;
    Ok(value)
}

/// `{"success": true}`
pub(crate) fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}
