//! Append-only activity log.

use rusqlite::{Connection, params};

use casebook_core::{IdPrefix, generate_id, now_iso};

use super::{CaseRepository, parse_metadata};
use crate::errors::CaseError;
use crate::types::{Activity, ActivityFeedItem, LogActivityParams};

const ACTIVITY_COLUMNS: &str =
    "a.id, a.activity_type, a.description, a.user_id, a.case_id, a.metadata, a.created_at";

impl CaseRepository {
    // ─────────────────────────────────────────────────────────────────────
    // Activity
    // ─────────────────────────────────────────────────────────────────────

    /// Append an activity row.
    pub fn log_activity(
        conn: &Connection,
        params: &LogActivityParams,
    ) -> Result<Activity, CaseError> {
        let metadata_json = params
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let activity = Activity {
            id: generate_id(IdPrefix::Activity),
            activity_type: params.kind.as_str().to_string(),
            description: params.description.clone(),
            user_id: params.user_id.clone(),
            case_id: params.case_id.clone(),
            metadata: params.metadata.clone(),
            created_at: now_iso(),
        };
        let _ = conn.execute(
            "INSERT INTO activities (id, activity_type, description, user_id, case_id,
             metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                activity.id,
                activity.activity_type,
                activity.description,
                activity.user_id,
                activity.case_id,
                metadata_json,
                activity.created_at,
            ],
        )?;
        Ok(activity)
    }

    /// Activity of one case, newest first.
    pub fn list_case_activity(
        conn: &Connection,
        case_id: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, CaseError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities a WHERE a.case_id = ?1
             ORDER BY a.created_at DESC, a.rowid DESC LIMIT ?2"
        ))?;
        let activities = stmt
            .query_map(params![case_id, limit], activity_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(activities)
    }

    /// Number of activity rows for a case.
    pub fn count_case_activity(conn: &Connection, case_id: &str) -> Result<u32, CaseError> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM activities WHERE case_id = ?1",
            params![case_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Latest activity across all cases with actor name and case title.
    pub fn recent_activity(
        conn: &Connection,
        limit: u32,
    ) -> Result<Vec<ActivityFeedItem>, CaseError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS}, u.name AS user_name, c.title AS case_title
             FROM activities a
             LEFT JOIN users u ON u.id = a.user_id
             LEFT JOIN cases c ON c.id = a.case_id
             ORDER BY a.created_at DESC, a.rowid DESC LIMIT ?1"
        ))?;
        let feed = stmt
            .query_map(params![limit], |row| {
                Ok(ActivityFeedItem {
                    activity: activity_from_row(row)?,
                    user_name: row.get("user_name")?,
                    case_title: row.get("case_title")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(feed)
    }
}

fn activity_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get("id")?,
        activity_type: row.get("activity_type")?,
        description: row.get("description")?,
        user_id: row.get("user_id")?,
        case_id: row.get("case_id")?,
        metadata: parse_metadata(row.get("metadata")?),
        created_at: row.get("created_at")?,
    })
}
