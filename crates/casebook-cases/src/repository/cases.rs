//! Case rows.

use rusqlite::{Connection, OptionalExtension, params};

use casebook_core::{IdPrefix, generate_id, now_iso};

use super::{CaseRepository, normalize_optional};
use crate::errors::CaseError;
use crate::types::{
    Case, CaseCreateParams, CaseFilter, CaseStats, CaseStatus, case_priority_from_sql,
    case_status_from_sql,
};

const CASE_COLUMNS: &str = "id, title, description, status, priority, client_name, client_email, \
     client_phone, created_by_id, assigned_to_id, progress, estimated_hours, actual_hours, \
     due_date, created_at, updated_at";

impl CaseRepository {
    // ─────────────────────────────────────────────────────────────────────
    // Case CRUD
    // ─────────────────────────────────────────────────────────────────────

    /// Create a new case in `NEW` status.
    pub fn create_case(
        conn: &Connection,
        params: &CaseCreateParams,
        created_by_id: &str,
    ) -> Result<Case, CaseError> {
        let id = generate_id(IdPrefix::Case);
        let now = now_iso();
        let priority = params.priority.unwrap_or_default();
        // Blank strings become NULL so the FK is not checked against "".
        let assigned_to_id = params
            .assigned_to_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let _ = conn.execute(
            "INSERT INTO cases (id, title, description, status, priority, client_name,
             client_email, client_phone, created_by_id, assigned_to_id, progress,
             estimated_hours, actual_hours, due_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, 0, ?12, ?13, ?13)",
            params![
                id,
                params.title.trim(),
                normalize_optional(params.description.as_deref()),
                CaseStatus::New.as_sql(),
                priority.as_sql(),
                normalize_optional(params.client_name.as_deref()),
                normalize_optional(params.client_email.as_deref()),
                normalize_optional(params.client_phone.as_deref()),
                created_by_id,
                assigned_to_id,
                params.estimated_hours,
                normalize_optional(params.due_date.as_deref()),
                now,
            ],
        )?;

        Self::get_case(conn, &id)?.ok_or_else(|| CaseError::case_not_found(&id))
    }

    /// Get a case by ID.
    pub fn get_case(conn: &Connection, id: &str) -> Result<Option<Case>, CaseError> {
        let case = conn
            .query_row(
                &format!("SELECT {CASE_COLUMNS} FROM cases WHERE id = ?1"),
                params![id],
                case_from_row,
            )
            .optional()?;
        Ok(case)
    }

    /// Whether a case with this ID exists.
    pub fn case_exists(conn: &Connection, id: &str) -> Result<bool, CaseError> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cases WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// List cases, newest first.
    pub fn list_cases(conn: &Connection, filter: &CaseFilter) -> Result<Vec<Case>, CaseError> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            values.push(Box::new(status.as_sql()));
        }
        if let Some(priority) = filter.priority {
            conditions.push("priority = ?");
            values.push(Box::new(priority.as_sql()));
        }
        if let Some(ref assignee) = filter.assigned_to_id {
            conditions.push("assigned_to_id = ?");
            values.push(Box::new(assignee.clone()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {CASE_COLUMNS} FROM cases{where_clause} ORDER BY created_at DESC, rowid DESC"
        );

        let params: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(AsRef::as_ref).collect();
        let mut stmt = conn.prepare(&sql)?;
        let cases = stmt
            .query_map(params.as_slice(), case_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cases)
    }

    /// Set a case's status. Returns `false` if the case does not exist.
    pub fn update_case_status(
        conn: &Connection,
        id: &str,
        status: CaseStatus,
    ) -> Result<bool, CaseError> {
        let changed = conn.execute(
            "UPDATE cases SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_sql(), now_iso(), id],
        )?;
        Ok(changed > 0)
    }

    /// Persist derived progress on a case.
    pub fn set_progress(conn: &Connection, id: &str, progress: u32) -> Result<bool, CaseError> {
        let changed = conn.execute(
            "UPDATE cases SET progress = ?1, updated_at = ?2 WHERE id = ?3",
            params![progress.min(100), now_iso(), id],
        )?;
        Ok(changed > 0)
    }

    /// Add logged hours to a case's running total.
    pub fn increment_actual_hours(
        conn: &Connection,
        id: &str,
        hours: f64,
    ) -> Result<bool, CaseError> {
        let changed = conn.execute(
            "UPDATE cases SET actual_hours = actual_hours + ?1, updated_at = ?2 WHERE id = ?3",
            params![hours, now_iso(), id],
        )?;
        Ok(changed > 0)
    }

    /// Count cases per status.
    pub fn count_by_status(conn: &Connection) -> Result<CaseStats, CaseError> {
        let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM cases GROUP BY status")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stats = CaseStats::default();
        for (status, count) in rows {
            match case_status_from_sql(&status) {
                CaseStatus::New => stats.new = count,
                CaseStatus::InProgress => stats.in_progress = count,
                CaseStatus::Review => stats.review = count,
                CaseStatus::Completed => stats.completed = count,
            }
        }
        Ok(stats)
    }
}

fn case_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Case> {
    let status: String = row.get("status")?;
    let priority: String = row.get("priority")?;
    Ok(Case {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: case_status_from_sql(&status),
        priority: case_priority_from_sql(&priority),
        client_name: row.get("client_name")?,
        client_email: row.get("client_email")?,
        client_phone: row.get("client_phone")?,
        created_by_id: row.get("created_by_id")?,
        assigned_to_id: row.get("assigned_to_id")?,
        progress: row.get("progress")?,
        estimated_hours: row.get("estimated_hours")?,
        actual_hours: row.get("actual_hours")?,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
