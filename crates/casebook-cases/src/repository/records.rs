//! Time entries, comments, and legal references.

use rusqlite::{Connection, OptionalExtension, params};

use casebook_core::{IdPrefix, generate_id, now_iso};

use super::{CaseRepository, normalize_optional};
use crate::errors::CaseError;
use crate::types::{
    Comment, CommentCreateParams, LegalReference, LegalReferenceCreateParams, TimeEntry,
    TimeEntryCreateParams, TimeEntryListItem,
};

const TIME_COLUMNS: &str = "t.id, t.case_id, t.user_id, t.description, t.hours, t.date, \
     t.billable, t.hourly_rate, t.amount, t.created_at";

impl CaseRepository {
    // ─────────────────────────────────────────────────────────────────────
    // Time entries
    // ─────────────────────────────────────────────────────────────────────

    /// Insert a time entry. `date` must already be normalized to
    /// `YYYY-MM-DD`; `amount` is computed by the caller.
    pub fn insert_time_entry(
        conn: &Connection,
        case_id: &str,
        user_id: &str,
        params: &TimeEntryCreateParams,
        date: &str,
        amount: Option<f64>,
    ) -> Result<TimeEntry, CaseError> {
        let id = generate_id(IdPrefix::TimeEntry);
        let _ = conn.execute(
            "INSERT INTO time_entries (id, case_id, user_id, description, hours, date,
             billable, hourly_rate, amount, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                case_id,
                user_id,
                normalize_optional(params.description.as_deref()),
                params.hours,
                date,
                params.billable.unwrap_or(true),
                params.hourly_rate,
                amount,
                now_iso(),
            ],
        )?;

        let entry = conn
            .query_row(
                &format!("SELECT {TIME_COLUMNS} FROM time_entries t WHERE t.id = ?1"),
                params![id],
                time_entry_from_row,
            )
            .optional()?;
        entry.ok_or_else(|| CaseError::NotFound {
            entity: "Time entry",
            id,
        })
    }

    /// Time entries of one case, newest work date first.
    pub fn list_case_time_entries(
        conn: &Connection,
        case_id: &str,
    ) -> Result<Vec<TimeEntry>, CaseError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {TIME_COLUMNS} FROM time_entries t WHERE t.case_id = ?1
             ORDER BY t.date DESC, t.created_at DESC, t.rowid DESC"
        ))?;
        let entries = stmt
            .query_map(params![case_id], time_entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Every time entry with case title and user name, newest work date first.
    pub fn list_time_entries(conn: &Connection) -> Result<Vec<TimeEntryListItem>, CaseError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {TIME_COLUMNS}, c.title AS case_title, u.name AS user_name
             FROM time_entries t
             JOIN cases c ON c.id = t.case_id
             LEFT JOIN users u ON u.id = t.user_id
             ORDER BY t.date DESC, t.created_at DESC, t.rowid DESC"
        ))?;
        let entries = stmt
            .query_map([], |row| {
                Ok(TimeEntryListItem {
                    entry: time_entry_from_row(row)?,
                    case_title: row.get("case_title")?,
                    user_name: row.get("user_name")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Comments
    // ─────────────────────────────────────────────────────────────────────

    /// Insert a comment.
    pub fn insert_comment(
        conn: &Connection,
        case_id: &str,
        author_id: &str,
        params: &CommentCreateParams,
    ) -> Result<Comment, CaseError> {
        let comment = Comment {
            id: generate_id(IdPrefix::Comment),
            case_id: case_id.to_string(),
            author_id: author_id.to_string(),
            content: params.content.trim().to_string(),
            is_internal: params.is_internal,
            created_at: now_iso(),
        };
        let _ = conn.execute(
            "INSERT INTO comments (id, case_id, author_id, content, is_internal, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                comment.id,
                comment.case_id,
                comment.author_id,
                comment.content,
                comment.is_internal,
                comment.created_at,
            ],
        )?;
        Ok(comment)
    }

    /// Comments of a case, newest first.
    pub fn list_comments(conn: &Connection, case_id: &str) -> Result<Vec<Comment>, CaseError> {
        let mut stmt = conn.prepare(
            "SELECT id, case_id, author_id, content, is_internal, created_at
             FROM comments WHERE case_id = ?1 ORDER BY created_at DESC, rowid DESC",
        )?;
        let comments = stmt
            .query_map(params![case_id], |row| {
                Ok(Comment {
                    id: row.get(0)?,
                    case_id: row.get(1)?,
                    author_id: row.get(2)?,
                    content: row.get(3)?,
                    is_internal: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(comments)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Legal references
    // ─────────────────────────────────────────────────────────────────────

    /// Attach a legal reference to a case.
    pub fn insert_legal_reference(
        conn: &Connection,
        case_id: &str,
        added_by_id: &str,
        params: &LegalReferenceCreateParams,
    ) -> Result<LegalReference, CaseError> {
        let reference = LegalReference {
            id: generate_id(IdPrefix::LegalReference),
            case_id: case_id.to_string(),
            added_by_id: Some(added_by_id.to_string()),
            ref_type: params.ref_type.trim().to_string(),
            title: params.title.trim().to_string(),
            citation: params.citation.trim().to_string(),
            url: normalize_optional(params.url.as_deref()),
            summary: normalize_optional(params.summary.as_deref()),
            relevance: normalize_optional(params.relevance.as_deref()),
            created_at: now_iso(),
        };
        let _ = conn.execute(
            "INSERT INTO legal_references (id, case_id, added_by_id, ref_type, title,
             citation, url, summary, relevance, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                reference.id,
                reference.case_id,
                reference.added_by_id,
                reference.ref_type,
                reference.title,
                reference.citation,
                reference.url,
                reference.summary,
                reference.relevance,
                reference.created_at,
            ],
        )?;
        Ok(reference)
    }

    /// Legal references of a case in the order they were attached.
    pub fn list_legal_references(
        conn: &Connection,
        case_id: &str,
    ) -> Result<Vec<LegalReference>, CaseError> {
        let mut stmt = conn.prepare(
            "SELECT id, case_id, added_by_id, ref_type, title, citation, url, summary,
             relevance, created_at
             FROM legal_references WHERE case_id = ?1 ORDER BY created_at ASC, rowid ASC",
        )?;
        let references = stmt
            .query_map(params![case_id], |row| {
                Ok(LegalReference {
                    id: row.get(0)?,
                    case_id: row.get(1)?,
                    added_by_id: row.get(2)?,
                    ref_type: row.get(3)?,
                    title: row.get(4)?,
                    citation: row.get(5)?,
                    url: row.get(6)?,
                    summary: row.get(7)?,
                    relevance: row.get(8)?,
                    created_at: row.get(9)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(references)
    }
}

fn time_entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TimeEntry> {
    Ok(TimeEntry {
        id: row.get("id")?,
        case_id: row.get("case_id")?,
        user_id: row.get("user_id")?,
        description: row.get("description")?,
        hours: row.get("hours")?,
        date: row.get("date")?,
        billable: row.get("billable")?,
        hourly_rate: row.get("hourly_rate")?,
        amount: row.get("amount")?,
        created_at: row.get("created_at")?,
    })
}
