//! Legacy milestone rows.

use rusqlite::{Connection, OptionalExtension, params};

use casebook_core::{IdPrefix, generate_id, now_iso};

use super::{CaseRepository, normalize_optional};
use crate::errors::CaseError;
use crate::types::{Milestone, MilestoneCreateParams};

const MILESTONE_COLUMNS: &str = "id, case_id, title, description, due_date, milestone_order, \
     completed, completed_at, completed_by_id, created_at";

impl CaseRepository {
    // ─────────────────────────────────────────────────────────────────────
    // Milestones
    // ─────────────────────────────────────────────────────────────────────

    /// Append a milestone after the current last one.
    pub fn insert_milestone(
        conn: &Connection,
        case_id: &str,
        params: &MilestoneCreateParams,
    ) -> Result<Milestone, CaseError> {
        let id = generate_id(IdPrefix::Milestone);
        let _ = conn.execute(
            "INSERT INTO milestones (id, case_id, title, description, due_date,
             milestone_order, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5,
                     (SELECT COALESCE(MAX(milestone_order), 0) + 1
                      FROM milestones WHERE case_id = ?2),
                     0, ?6)",
            params![
                id,
                case_id,
                params.title.trim(),
                normalize_optional(params.description.as_deref()),
                normalize_optional(params.due_date.as_deref()),
                now_iso(),
            ],
        )?;
        Self::get_milestone(conn, case_id, &id)?.ok_or_else(|| CaseError::milestone_not_found(&id))
    }

    /// Get a milestone by ID within a case.
    pub fn get_milestone(
        conn: &Connection,
        case_id: &str,
        milestone_id: &str,
    ) -> Result<Option<Milestone>, CaseError> {
        let milestone = conn
            .query_row(
                &format!(
                    "SELECT {MILESTONE_COLUMNS} FROM milestones WHERE id = ?1 AND case_id = ?2"
                ),
                params![milestone_id, case_id],
                milestone_from_row,
            )
            .optional()?;
        Ok(milestone)
    }

    /// All milestones of a case in order.
    pub fn list_milestones(conn: &Connection, case_id: &str) -> Result<Vec<Milestone>, CaseError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {MILESTONE_COLUMNS} FROM milestones WHERE case_id = ?1
             ORDER BY milestone_order ASC, rowid ASC"
        ))?;
        let milestones = stmt
            .query_map(params![case_id], milestone_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(milestones)
    }

    /// Set completion state; `completed_at` and `completed_by_id` are cleared
    /// by passing `None`.
    pub fn set_milestone_completed(
        conn: &Connection,
        case_id: &str,
        milestone_id: &str,
        completed: bool,
        completed_at: Option<&str>,
        completed_by_id: Option<&str>,
    ) -> Result<bool, CaseError> {
        let changed = conn.execute(
            "UPDATE milestones SET completed = ?1, completed_at = ?2, completed_by_id = ?3
             WHERE id = ?4 AND case_id = ?5",
            params![completed, completed_at, completed_by_id, milestone_id, case_id],
        )?;
        Ok(changed > 0)
    }

    /// `(completed, total)` milestone counts for a case.
    pub fn count_milestones(conn: &Connection, case_id: &str) -> Result<(u32, u32), CaseError> {
        let counts = conn.query_row(
            "SELECT COALESCE(SUM(completed), 0), COUNT(*) FROM milestones WHERE case_id = ?1",
            params![case_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(counts)
    }
}

fn milestone_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Milestone> {
    Ok(Milestone {
        id: row.get("id")?,
        case_id: row.get("case_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        due_date: row.get("due_date")?,
        order: row.get("milestone_order")?,
        completed: row.get("completed")?,
        completed_at: row.get("completed_at")?,
        completed_by_id: row.get("completed_by_id")?,
        created_at: row.get("created_at")?,
    })
}
