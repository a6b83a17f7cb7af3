//! Workflow step routes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde_json::Value;
use tracing::{info, instrument};

use casebook_cases::{
    CaseService, DeleteStepOptions, WorkflowStep, WorkflowStepCreateParams, parse_step_ids,
};

use super::{body, success, with_conn};
use crate::errors::ApiError;
use crate::identity::CurrentUser;
use crate::metrics::WORKFLOW_MUTATIONS_TOTAL;
use crate::server::AppState;

fn record_mutation(action: &'static str) {
    metrics::counter!(WORKFLOW_MUTATIONS_TOTAL, "action" => action).increment(1);
}

/// GET /cases/{case_id}/workflow-steps
pub async fn list_steps(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(case_id): Path<String>,
) -> Result<Json<Vec<WorkflowStep>>, ApiError> {
    let steps = with_conn(&state, move |conn| {
        CaseService::list_workflow_steps(conn, &case_id)
    })
    .await?;
    Ok(Json(steps))
}

/// POST /cases/{case_id}/workflow-steps
#[instrument(skip_all, fields(case_id = %case_id))]
pub async fn create_step(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(case_id): Path<String>,
    payload: Result<Json<WorkflowStepCreateParams>, JsonRejection>,
) -> Result<Json<WorkflowStep>, ApiError> {
    let params = body(payload)?;
    let step = with_conn(&state, move |conn| {
        CaseService::create_workflow_step(conn, &user, &case_id, &params)
    })
    .await?;
    record_mutation("create");
    info!(step_id = %step.id, order = step.order, "workflow step created");
    Ok(Json(step))
}

/// POST /cases/{case_id}/workflow-steps/{step_id}/toggle
#[instrument(skip_all, fields(case_id = %case_id, step_id = %step_id))]
pub async fn toggle_step(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((case_id, step_id)): Path<(String, String)>,
) -> Result<Json<WorkflowStep>, ApiError> {
    let step = with_conn(&state, move |conn| {
        CaseService::toggle_workflow_step(conn, &user, &case_id, &step_id)
    })
    .await?;
    record_mutation("toggle");
    Ok(Json(step))
}

/// POST /cases/{case_id}/workflow-steps/reorder
///
/// The body is taken as raw JSON so a non-array `stepIds` is a 400 with a
/// specific message rather than a generic deserialization failure.
#[instrument(skip_all, fields(case_id = %case_id))]
pub async fn reorder_steps(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(case_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let raw = body(payload)?;
    let step_ids = parse_step_ids(&raw)?;
    let count = step_ids.len();
    with_conn(&state, move |conn| {
        CaseService::reorder_workflow_steps(conn, &user, &case_id, &step_ids)
    })
    .await?;
    record_mutation("reorder");
    info!(step_count = count, "workflow steps reordered");
    Ok(success())
}

/// DELETE /cases/{case_id}/workflow-steps/{step_id}
#[instrument(skip_all, fields(case_id = %case_id, step_id = %step_id))]
pub async fn delete_step(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((case_id, step_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let options = DeleteStepOptions {
        recompute_progress: state.config.recompute_progress_on_delete,
    };
    with_conn(&state, move |conn| {
        CaseService::delete_workflow_step(conn, &user, &case_id, &step_id, options)
    })
    .await?;
    record_mutation("delete");
    Ok(success())
}
