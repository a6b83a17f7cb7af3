//! Request identity: session token extraction and resolution.
//!
//! The session itself is issued elsewhere; this module only reads the token
//! from the request and asks an [`IdentityProvider`] who it belongs to.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

use casebook_cases::{CaseRepository, Identity};
use casebook_store::{ConnectionPool, StoreError};

use crate::errors::ApiError;
use crate::server::AppState;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "casebook_session";

/// Resolves a session token to the identity behind it.
///
/// Implementations may block; the extractor calls them off the async runtime.
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` for unknown, expired, or revoked tokens.
    fn resolve(&self, token: &str) -> Result<Option<Identity>, ApiError>;
}

/// Looks tokens up in the `sessions` table.
pub struct SqliteIdentityProvider {
    pool: ConnectionPool,
}

impl SqliteIdentityProvider {
    /// Create a provider backed by `pool`.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

impl IdentityProvider for SqliteIdentityProvider {
    fn resolve(&self, token: &str) -> Result<Option<Identity>, ApiError> {
        let conn = self.pool.get().map_err(StoreError::from)?;
        let identity = CaseRepository::resolve_session(&conn, token, &casebook_core::now_iso())?;
        Ok(identity)
    }
}

/// Pull the session token from `Authorization: Bearer` or the session cookie.
/// The header wins when both are present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Extractor for the authenticated user. Rejects with 401 before the handler
/// body runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = extract_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let provider: Arc<dyn IdentityProvider> = Arc::clone(&state.identity);
        let identity = tokio::task::spawn_blocking(move || provider.resolve(&token))
            .await
            .map_err(|e| ApiError::Internal(format!("identity lookup task failed: {e}")))??;
        identity.map(CurrentUser).ok_or(ApiError::Unauthorized)
    }
}
