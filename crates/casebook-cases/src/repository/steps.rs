//! Workflow step rows.
//!
//! Every lookup and write is scoped by `case_id` so a step id from another
//! case never matches.

use rusqlite::{Connection, OptionalExtension, params};

use casebook_core::{IdPrefix, generate_id, now_iso};

use super::{CaseRepository, id_list_to_json, normalize_optional, parse_id_list};
use crate::errors::CaseError;
use crate::types::{WorkflowStep, WorkflowStepCreateParams};

const STEP_COLUMNS: &str = "id, case_id, title, description, step_order, completed, completed_at, \
     assigned_to_id, estimated_hours, due_date, dependencies, created_at, updated_at";

impl CaseRepository {
    // ─────────────────────────────────────────────────────────────────────
    // Workflow steps
    // ─────────────────────────────────────────────────────────────────────

    /// Highest step order in a case, `0` when the case has no steps.
    pub fn max_step_order(conn: &Connection, case_id: &str) -> Result<u32, CaseError> {
        let max: u32 = conn.query_row(
            "SELECT COALESCE(MAX(step_order), 0) FROM workflow_steps WHERE case_id = ?1",
            params![case_id],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    /// Insert a step at the given order with no dependencies.
    pub fn insert_step(
        conn: &Connection,
        case_id: &str,
        params: &WorkflowStepCreateParams,
        order: u32,
    ) -> Result<WorkflowStep, CaseError> {
        let id = generate_id(IdPrefix::Step);
        let now = now_iso();
        let assigned_to_id = params
            .assigned_to_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let _ = conn.execute(
            "INSERT INTO workflow_steps (id, case_id, title, description, step_order,
             completed, completed_at, assigned_to_id, estimated_hours, due_date,
             dependencies, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, NULL, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                id,
                case_id,
                params.title.trim(),
                normalize_optional(params.description.as_deref()),
                order,
                assigned_to_id,
                params.estimated_hours,
                normalize_optional(params.due_date.as_deref()),
                id_list_to_json(&[]),
                now,
            ],
        )?;

        Self::get_step(conn, case_id, &id)?.ok_or_else(|| CaseError::step_not_found(&id))
    }

    /// Get a step by ID within a case.
    pub fn get_step(
        conn: &Connection,
        case_id: &str,
        step_id: &str,
    ) -> Result<Option<WorkflowStep>, CaseError> {
        let step = conn
            .query_row(
                &format!(
                    "SELECT {STEP_COLUMNS} FROM workflow_steps WHERE id = ?1 AND case_id = ?2"
                ),
                params![step_id, case_id],
                step_from_row,
            )
            .optional()?;
        Ok(step)
    }

    /// All steps of a case by order, ties broken by creation.
    pub fn list_steps(conn: &Connection, case_id: &str) -> Result<Vec<WorkflowStep>, CaseError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {STEP_COLUMNS} FROM workflow_steps WHERE case_id = ?1
             ORDER BY step_order ASC, created_at ASC, rowid ASC"
        ))?;
        let steps = stmt
            .query_map(params![case_id], step_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(steps)
    }

    /// Set completion state. `completed_at` should be `None` when reopening.
    pub fn set_step_completed(
        conn: &Connection,
        case_id: &str,
        step_id: &str,
        completed: bool,
        completed_at: Option<&str>,
    ) -> Result<bool, CaseError> {
        let changed = conn.execute(
            "UPDATE workflow_steps SET completed = ?1, completed_at = ?2, updated_at = ?3
             WHERE id = ?4 AND case_id = ?5",
            params![completed, completed_at, now_iso(), step_id, case_id],
        )?;
        Ok(changed > 0)
    }

    /// Set a step's order. Returns `false` when no step of the case matches.
    pub fn set_step_order(
        conn: &Connection,
        case_id: &str,
        step_id: &str,
        order: u32,
    ) -> Result<bool, CaseError> {
        let changed = conn.execute(
            "UPDATE workflow_steps SET step_order = ?1, updated_at = ?2
             WHERE id = ?3 AND case_id = ?4",
            params![order, now_iso(), step_id, case_id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a step. Remaining steps keep their orders.
    pub fn delete_step(conn: &Connection, case_id: &str, step_id: &str) -> Result<bool, CaseError> {
        let changed = conn.execute(
            "DELETE FROM workflow_steps WHERE id = ?1 AND case_id = ?2",
            params![step_id, case_id],
        )?;
        Ok(changed > 0)
    }

    /// `(completed, total)` step counts for a case.
    pub fn count_steps(conn: &Connection, case_id: &str) -> Result<(u32, u32), CaseError> {
        let counts = conn.query_row(
            "SELECT COALESCE(SUM(completed), 0), COUNT(*) FROM workflow_steps WHERE case_id = ?1",
            params![case_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(counts)
    }
}

fn step_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WorkflowStep> {
    let dependencies: String = row.get("dependencies")?;
    Ok(WorkflowStep {
        id: row.get("id")?,
        case_id: row.get("case_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        order: row.get("step_order")?,
        completed: row.get("completed")?,
        completed_at: row.get("completed_at")?,
        assigned_to_id: row.get("assigned_to_id")?,
        estimated_hours: row.get("estimated_hours")?,
        due_date: row.get("due_date")?,
        dependencies: parse_id_list(&dependencies),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::repository::test_support::{seed_case, seed_user, setup_db};

    fn step(title: &str) -> WorkflowStepCreateParams {
        WorkflowStepCreateParams {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn max_order_empty_case_is_zero() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        let case = seed_case(&conn, &user, "A");
        assert_eq!(CaseRepository::max_step_order(&conn, &case.id).unwrap(), 0);
    }

    #[test]
    fn insert_and_list_in_order() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        let case = seed_case(&conn, &user, "A");
        CaseRepository::insert_step(&conn, &case.id, &step("second"), 2).unwrap();
        let first = CaseRepository::insert_step(&conn, &case.id, &step("first"), 1).unwrap();
        assert!(first.id.starts_with("step-"));
        assert!(first.dependencies.is_empty());
        assert!(!first.completed);

        let steps = CaseRepository::list_steps(&conn, &case.id).unwrap();
        let titles: Vec<_> = steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert_eq!(CaseRepository::max_step_order(&conn, &case.id).unwrap(), 2);
    }

    #[test]
    fn get_step_is_scoped_to_case() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        let a = seed_case(&conn, &user, "A");
        let b = seed_case(&conn, &user, "B");
        let s = CaseRepository::insert_step(&conn, &a.id, &step("x"), 1).unwrap();
        assert!(CaseRepository::get_step(&conn, &a.id, &s.id).unwrap().is_some());
        assert!(CaseRepository::get_step(&conn, &b.id, &s.id).unwrap().is_none());
        assert!(!CaseRepository::set_step_order(&conn, &b.id, &s.id, 5).unwrap());
        assert!(!CaseRepository::delete_step(&conn, &b.id, &s.id).unwrap());
    }

    #[test]
    fn completion_and_counts() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        let case = seed_case(&conn, &user, "A");
        let s1 = CaseRepository::insert_step(&conn, &case.id, &step("1"), 1).unwrap();
        CaseRepository::insert_step(&conn, &case.id, &step("2"), 2).unwrap();
        assert_eq!(CaseRepository::count_steps(&conn, &case.id).unwrap(), (0, 2));

        CaseRepository::set_step_completed(
            &conn,
            &case.id,
            &s1.id,
            true,
            Some("2026-10-18T12:00:00Z"),
        )
        .unwrap();
        assert_eq!(CaseRepository::count_steps(&conn, &case.id).unwrap(), (1, 2));
        let s1 = CaseRepository::get_step(&conn, &case.id, &s1.id).unwrap().unwrap();
        assert!(s1.completed);
        assert_eq!(s1.completed_at.as_deref(), Some("2026-10-18T12:00:00Z"));
    }

    #[test]
    fn count_steps_empty_case() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        let case = seed_case(&conn, &user, "A");
        assert_eq!(CaseRepository::count_steps(&conn, &case.id).unwrap(), (0, 0));
    }

    #[test]
    fn steps_cascade_with_case() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        let case = seed_case(&conn, &user, "A");
        CaseRepository::insert_step(&conn, &case.id, &step("1"), 1).unwrap();
        conn.execute("DELETE FROM cases WHERE id = ?1", params![case.id])
            .unwrap();
        assert!(CaseRepository::list_steps(&conn, &case.id).unwrap().is_empty());
    }

    #[test]
    fn insert_into_unknown_case_fails() {
        let conn = setup_db();
        let err = CaseRepository::insert_step(&conn, "case-missing", &step("x"), 1).unwrap_err();
        assert!(matches!(err, CaseError::Database(_)));
    }
}
