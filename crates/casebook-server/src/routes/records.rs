//! Routes for the records hanging off a case: milestones, time entries,
//! comments, and legal references.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use tracing::{info, instrument};

use casebook_cases::{
    CaseService, Comment, CommentCreateParams, LegalReference, LegalReferenceCreateParams,
    Milestone, MilestoneCreateParams, TimeEntry, TimeEntryCreateParams, TimeSheet,
};

use super::{body, with_conn};
use crate::errors::ApiError;
use crate::identity::CurrentUser;
use crate::server::AppState;

/// POST /cases/{case_id}/milestones
pub async fn create_milestone(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(case_id): Path<String>,
    payload: Result<Json<MilestoneCreateParams>, JsonRejection>,
) -> Result<Json<Milestone>, ApiError> {
    let params = body(payload)?;
    let milestone = with_conn(&state, move |conn| {
        CaseService::create_milestone(conn, &user, &case_id, &params)
    })
    .await?;
    Ok(Json(milestone))
}

/// POST /cases/{case_id}/milestones/{milestone_id}/toggle
pub async fn toggle_milestone(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((case_id, milestone_id)): Path<(String, String)>,
) -> Result<Json<Milestone>, ApiError> {
    let milestone = with_conn(&state, move |conn| {
        CaseService::toggle_milestone(conn, &user, &case_id, &milestone_id)
    })
    .await?;
    Ok(Json(milestone))
}

/// POST /cases/{case_id}/time-entries
#[instrument(skip_all, fields(case_id = %case_id))]
pub async fn log_time(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(case_id): Path<String>,
    payload: Result<Json<TimeEntryCreateParams>, JsonRejection>,
) -> Result<Json<TimeEntry>, ApiError> {
    let params = body(payload)?;
    let entry = with_conn(&state, move |conn| {
        CaseService::log_time(conn, &user, &case_id, &params)
    })
    .await?;
    info!(hours = entry.hours, billable = entry.billable, "time logged");
    Ok(Json(entry))
}

/// GET /time-entries
pub async fn list_time_entries(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<TimeSheet>, ApiError> {
    let today = chrono::Utc::now().date_naive();
    let sheet = with_conn(&state, move |conn| {
        CaseService::list_time_entries(conn, today)
    })
    .await?;
    Ok(Json(sheet))
}

/// POST /cases/{case_id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(case_id): Path<String>,
    payload: Result<Json<CommentCreateParams>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let params = body(payload)?;
    let comment = with_conn(&state, move |conn| {
        CaseService::add_comment(conn, &user, &case_id, &params)
    })
    .await?;
    Ok(Json(comment))
}

/// POST /cases/{case_id}/legal-references
pub async fn add_legal_reference(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(case_id): Path<String>,
    payload: Result<Json<LegalReferenceCreateParams>, JsonRejection>,
) -> Result<Json<LegalReference>, ApiError> {
    let params = body(payload)?;
    let reference = with_conn(&state, move |conn| {
        CaseService::add_legal_reference(conn, &user, &case_id, &params)
    })
    .await?;
    Ok(Json(reference))
}
