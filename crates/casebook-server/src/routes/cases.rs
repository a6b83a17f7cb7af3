//! Case routes: listing, creation, detail, status, and the dashboard queries
//! (stats, activity feed, calendar, users).

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{info, instrument};

use casebook_cases::{
    ActivityFeedItem, CalendarView, Case, CaseCreateParams, CaseDetail, CaseFilter, CaseService,
    CaseStats, CaseStatus, UserSummary,
};

use super::{body, with_conn};
use crate::errors::ApiError;
use crate::identity::CurrentUser;
use crate::server::AppState;

/// Body of `POST /cases/{case_id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    /// Target status.
    pub status: CaseStatus,
}

/// Query of `GET /calendar`. Both bounds are required.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    /// First day, `YYYY-MM-DD` or RFC 3339.
    pub start: Option<String>,
    /// Last day, inclusive.
    pub end: Option<String>,
}

/// GET /cases
pub async fn list_cases(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    filter: Result<Query<CaseFilter>, QueryRejection>,
) -> Result<Json<Vec<Case>>, ApiError> {
    let Query(filter) = filter.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let cases = with_conn(&state, move |conn| CaseService::list_cases(conn, &filter)).await?;
    Ok(Json(cases))
}

/// POST /cases
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn create_case(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CaseCreateParams>, JsonRejection>,
) -> Result<(StatusCode, Json<Case>), ApiError> {
    let params = body(payload)?;
    let case = with_conn(&state, move |conn| {
        CaseService::create_case(conn, &user, &params)
    })
    .await?;
    info!(case_id = %case.id, "case created");
    Ok((StatusCode::CREATED, Json(case)))
}

/// GET /cases/stats
pub async fn case_stats(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<CaseStats>, ApiError> {
    let stats = with_conn(&state, |conn| CaseService::case_stats(conn)).await?;
    Ok(Json(stats))
}

/// GET /cases/{case_id}
pub async fn get_case(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(case_id): Path<String>,
) -> Result<Json<CaseDetail>, ApiError> {
    let detail = with_conn(&state, move |conn| CaseService::get_case(conn, &case_id)).await?;
    Ok(Json(detail))
}

/// POST /cases/{case_id}/status
#[instrument(skip_all, fields(case_id = %case_id))]
pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(case_id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<Case>, ApiError> {
    let StatusUpdate { status } = body(payload)?;
    let case = with_conn(&state, move |conn| {
        CaseService::update_case_status(conn, &user, &case_id, status)
    })
    .await?;
    Ok(Json(case))
}

/// GET /activities
pub async fn activity_feed(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<ActivityFeedItem>>, ApiError> {
    let limit = state.config.activity_feed_limit;
    let feed = with_conn(&state, move |conn| CaseService::recent_activity(conn, limit)).await?;
    Ok(Json(feed))
}

/// GET /calendar?start=..&end=..
pub async fn calendar(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    query: Result<Query<CalendarQuery>, QueryRejection>,
) -> Result<Json<CalendarView>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (Some(start), Some(end)) = (query.start, query.end) else {
        return Err(ApiError::BadRequest(
            "Start date and end date are required".to_string(),
        ));
    };
    let view = with_conn(&state, move |conn| {
        CaseService::calendar_events(conn, &start, &end)
    })
    .await?;
    Ok(Json(view))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = with_conn(&state, |conn| CaseService::list_active_users(conn)).await?;
    Ok(Json(users))
}
