//! Case lifecycle and dashboard queries.

use rusqlite::Connection;
use serde_json::json;
use tracing::debug;

use super::{
    CaseService, normalize_date, require_assignee, require_case, required_text, with_immediate,
};
use crate::errors::CaseError;
use crate::repository::{CaseRepository, normalize_optional};
use crate::types::{
    ActivityFeedItem, ActivityKind, Case, CaseCreateParams, CaseDetail, CaseFilter, CaseStats,
    CaseStatus, Identity, LogActivityParams, UserSummary,
};

/// Activities included in a case detail view.
const DETAIL_ACTIVITY_LIMIT: u32 = 20;

impl CaseService {
    // ─────────────────────────────────────────────────────────────────────
    // Cases
    // ─────────────────────────────────────────────────────────────────────

    /// Open a case in `NEW` status.
    pub fn create_case(
        conn: &mut Connection,
        actor: &Identity,
        params: &CaseCreateParams,
    ) -> Result<Case, CaseError> {
        let title = required_text(&params.title, "Title")?.to_string();
        if params.estimated_hours.is_some_and(|h| h < 0.0) {
            return Err(CaseError::Validation(
                "Estimated hours cannot be negative".to_string(),
            ));
        }

        let due_date = params
            .due_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(normalize_date)
            .transpose()?;
        let params = CaseCreateParams {
            due_date,
            ..params.clone()
        };

        with_immediate(conn, |tx| {
            require_assignee(tx, params.assigned_to_id.as_deref())?;
            let case = CaseRepository::create_case(tx, &params, &actor.user_id)?;
            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind: ActivityKind::CaseCreated,
                    description: format!("Case \"{title}\" was created"),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case.id.clone()),
                    metadata: Some(json!({
                        "priority": case.priority.as_sql(),
                        "clientName": normalize_optional(params.client_name.as_deref()),
                    })),
                },
            )?;
            debug!(case_id = %case.id, "case created");
            Ok(case)
        })
    }

    /// List cases, newest first.
    pub fn list_cases(conn: &Connection, filter: &CaseFilter) -> Result<Vec<Case>, CaseError> {
        CaseRepository::list_cases(conn, filter)
    }

    /// A case with all of its children and its most recent activity.
    pub fn get_case(conn: &Connection, case_id: &str) -> Result<CaseDetail, CaseError> {
        let case = CaseRepository::get_case(conn, case_id)?
            .ok_or_else(|| CaseError::case_not_found(case_id))?;

        Ok(CaseDetail {
            workflow_steps: CaseRepository::list_steps(conn, case_id)?,
            milestones: CaseRepository::list_milestones(conn, case_id)?,
            time_entries: CaseRepository::list_case_time_entries(conn, case_id)?,
            comments: CaseRepository::list_comments(conn, case_id)?,
            legal_references: CaseRepository::list_legal_references(conn, case_id)?,
            activities: CaseRepository::list_case_activity(conn, case_id, DETAIL_ACTIVITY_LIMIT)?,
            case,
        })
    }

    /// Move a case to another status.
    pub fn update_case_status(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        status: CaseStatus,
    ) -> Result<Case, CaseError> {
        with_immediate(conn, |tx| {
            let current = CaseRepository::get_case(tx, case_id)?
                .ok_or_else(|| CaseError::case_not_found(case_id))?;
            if current.status == status {
                return Err(CaseError::Validation(format!("Case is already {status}")));
            }

            let _ = CaseRepository::update_case_status(tx, case_id, status)?;
            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind: ActivityKind::CaseStatusChanged,
                    description: format!("Case status changed from {} to {status}", current.status),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({
                        "from": current.status.as_sql(),
                        "to": status.as_sql(),
                    })),
                },
            )?;

            debug!(case_id, from = %current.status, to = %status, "case status changed");
            CaseRepository::get_case(tx, case_id)?.ok_or_else(|| CaseError::case_not_found(case_id))
        })
    }

    /// Case counts per status.
    pub fn case_stats(conn: &Connection) -> Result<CaseStats, CaseError> {
        CaseRepository::count_by_status(conn)
    }

    /// Latest activity across all cases.
    pub fn recent_activity(
        conn: &Connection,
        limit: u32,
    ) -> Result<Vec<ActivityFeedItem>, CaseError> {
        CaseRepository::recent_activity(conn, limit)
    }

    /// Active users with their assigned and opened case counts.
    pub fn list_active_users(conn: &Connection) -> Result<Vec<UserSummary>, CaseError> {
        CaseRepository::list_active_users(conn)
    }

    /// Fail with `NotFound` unless the case exists.
    pub fn ensure_case(conn: &Connection, case_id: &str) -> Result<(), CaseError> {
        require_case(conn, case_id)
    }
}
