//! Business logic layer for case management.
//!
//! Wraps the repository with validation, derived progress, and activity
//! logging. Key business rules:
//!
//! - **One activity per mutation**: every successful mutation appends exactly
//!   one activity row, written in the same transaction as the change.
//! - **Write lock up front**: mutations open an `IMMEDIATE` transaction, so
//!   read-modify-write sequences (toggle then recompute progress, create at
//!   `max(order) + 1`) never interleave across connections.
//! - **Derived progress**: `cases.progress` is recomputed from workflow steps
//!   on every toggle. Milestones drive it only for cases with no steps.
//! - **Scoped lookups**: a step or milestone id only resolves within its case.

mod calendar;
mod cases;
mod records;
mod workflow;

use chrono::{DateTime, NaiveDate};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::errors::CaseError;
use crate::progress::compute_progress;
use crate::repository::CaseRepository;

pub use workflow::parse_step_ids;

/// Case service with business logic and validation.
pub struct CaseService;

/// Options for [`CaseService::delete_workflow_step`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteStepOptions {
    /// Recompute case progress after the step is removed.
    pub recompute_progress: bool,
}

/// Run `f` inside an `IMMEDIATE` transaction, committing on success.
///
/// Dropping the transaction on the error path rolls back every write `f`
/// made, including any activity row.
fn with_immediate<T>(
    conn: &mut Connection,
    f: impl FnOnce(&Transaction<'_>) -> Result<T, CaseError>,
) -> Result<T, CaseError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Fail with `NotFound` unless the case exists.
fn require_case(conn: &Connection, case_id: &str) -> Result<(), CaseError> {
    if CaseRepository::case_exists(conn, case_id)? {
        Ok(())
    } else {
        Err(CaseError::case_not_found(case_id))
    }
}

/// Fail with `NotFound` when a non-blank assignee names no user.
fn require_assignee(conn: &Connection, assignee: Option<&str>) -> Result<(), CaseError> {
    match assignee.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => CaseRepository::get_user(conn, id)?
            .map(|_| ())
            .ok_or_else(|| CaseError::user_not_found(id)),
        None => Ok(()),
    }
}

/// Trimmed, non-empty text or a validation error naming the field.
fn required_text<'a>(value: &'a str, field: &str) -> Result<&'a str, CaseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CaseError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed)
    }
}

/// Normalize a calendar date given as `YYYY-MM-DD` or RFC 3339.
fn normalize_date(value: &str) -> Result<String, CaseError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.format("%Y-%m-%d").to_string());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
        .map_err(|_| CaseError::Validation(format!("Invalid date: {value}")))
}

/// Recompute and persist progress from workflow steps.
fn recompute_step_progress(conn: &Connection, case_id: &str) -> Result<u32, CaseError> {
    let (completed, total) = CaseRepository::count_steps(conn, case_id)?;
    let progress = compute_progress(completed, total);
    let _ = CaseRepository::set_progress(conn, case_id, progress)?;
    Ok(progress)
}
