//! Due-date queries backing the calendar feed.

use rusqlite::{Connection, params};

use super::CaseRepository;
use crate::errors::CaseError;
use crate::types::{
    CalendarEvent, CalendarEventKind, CaseStatus, case_priority_from_sql, case_status_from_sql,
};

impl CaseRepository {
    /// Cases whose due date falls in `[start, end]`, earliest first.
    ///
    /// Both bounds are `YYYY-MM-DD`; stored dates compare lexicographically.
    pub fn cases_due_between(
        conn: &Connection,
        start: &str,
        end: &str,
    ) -> Result<Vec<CalendarEvent>, CaseError> {
        let mut stmt = conn.prepare(
            "SELECT id, title, status, priority, client_name, assigned_to_id, due_date
             FROM cases
             WHERE due_date IS NOT NULL AND due_date >= ?1 AND due_date <= ?2
             ORDER BY due_date ASC, rowid ASC",
        )?;
        let events = stmt
            .query_map(params![start, end], |row| {
                let status = case_status_from_sql(&row.get::<_, String>("status")?);
                let priority: String = row.get("priority")?;
                let id: String = row.get("id")?;
                let title: String = row.get("title")?;
                Ok(CalendarEvent {
                    case_id: id.clone(),
                    case_title: title.clone(),
                    id,
                    kind: CalendarEventKind::Case,
                    title,
                    due_date: row.get("due_date")?,
                    status: Some(status),
                    priority: Some(case_priority_from_sql(&priority)),
                    client_name: row.get("client_name")?,
                    assigned_to_id: row.get("assigned_to_id")?,
                    completed: status == CaseStatus::Completed,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(events)
    }

    /// Milestones whose due date falls in `[start, end]`, earliest first.
    pub fn milestones_due_between(
        conn: &Connection,
        start: &str,
        end: &str,
    ) -> Result<Vec<CalendarEvent>, CaseError> {
        let mut stmt = conn.prepare(
            "SELECT m.id, m.title, m.due_date, m.completed, m.case_id, c.title AS case_title
             FROM milestones m JOIN cases c ON c.id = m.case_id
             WHERE m.due_date IS NOT NULL AND m.due_date >= ?1 AND m.due_date <= ?2
             ORDER BY m.due_date ASC, m.rowid ASC",
        )?;
        let events = stmt
            .query_map(params![start, end], |row| {
                Ok(CalendarEvent {
                    id: row.get("id")?,
                    kind: CalendarEventKind::Milestone,
                    title: row.get("title")?,
                    due_date: row.get("due_date")?,
                    case_id: row.get("case_id")?,
                    case_title: row.get("case_title")?,
                    status: None,
                    priority: None,
                    client_name: None,
                    assigned_to_id: None,
                    completed: row.get("completed")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(events)
    }
}

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::repository::test_support::{seed_user, setup_db};
    use crate::types::{CaseCreateParams, MilestoneCreateParams};

    fn case_due(conn: &Connection, user_id: &str, title: &str, due: Option<&str>) -> String {
        CaseRepository::create_case(
            conn,
            &CaseCreateParams {
                title: title.to_string(),
                due_date: due.map(String::from),
                ..Default::default()
            },
            user_id,
        )
        .unwrap()
        .id
    }

    #[test]
    fn cases_in_range_only() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        case_due(&conn, &user.id, "Before", Some("2026-09-30"));
        case_due(&conn, &user.id, "Late", Some("2026-10-31"));
        case_due(&conn, &user.id, "Early", Some("2026-10-01"));
        case_due(&conn, &user.id, "After", Some("2026-11-01"));
        case_due(&conn, &user.id, "Undated", None);

        let events = CaseRepository::cases_due_between(&conn, "2026-10-01", "2026-10-31").unwrap();
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late"]);
        assert!(events.iter().all(|e| e.kind == CalendarEventKind::Case));
        assert_eq!(events[0].case_id, events[0].id);
        assert_eq!(events[0].status, Some(CaseStatus::New));
        assert!(!events[0].completed);
    }

    #[test]
    fn milestones_carry_case_title() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        let case_id = case_due(&conn, &user.id, "Smith v. Jones", None);
        for (title, due) in [("Discovery", "2026-10-10"), ("Trial", "2027-02-01")] {
            CaseRepository::insert_milestone(
                &conn,
                &case_id,
                &MilestoneCreateParams {
                    title: title.to_string(),
                    due_date: Some(due.to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let events =
            CaseRepository::milestones_due_between(&conn, "2026-10-01", "2026-10-31").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Discovery");
        assert_eq!(events[0].case_title, "Smith v. Jones");
        assert_eq!(events[0].kind, CalendarEventKind::Milestone);
        assert!(events[0].status.is_none());
    }
}
