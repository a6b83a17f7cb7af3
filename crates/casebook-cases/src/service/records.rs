//! Milestones, time entries, comments, and legal references.

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::Connection;
use serde_json::json;
use tracing::debug;

use casebook_core::now_iso;

use super::{CaseService, normalize_date, require_case, required_text, with_immediate};
use crate::errors::CaseError;
use crate::progress::compute_progress;
use crate::repository::CaseRepository;
use crate::types::{
    ActivityKind, Comment, CommentCreateParams, Identity, LegalReference,
    LegalReferenceCreateParams, LogActivityParams, Milestone, MilestoneCreateParams, TimeEntry,
    TimeEntryCreateParams, TimeSheet, TimeStats,
};

/// Smallest loggable increment of time.
const MIN_TIME_ENTRY_HOURS: f64 = 0.25;

/// Billed amount: `hours × rate` for billable entries with a non-zero rate.
fn billed_amount(hours: f64, billable: bool, hourly_rate: Option<f64>) -> Option<f64> {
    hourly_rate
        .filter(|rate| billable && rate.abs() > f64::EPSILON)
        .map(|rate| hours * rate)
}

/// Sunday and Saturday bounding the week that contains `today`.
fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    (start, start + Duration::days(6))
}

impl CaseService {
    // ─────────────────────────────────────────────────────────────────────
    // Milestones
    // ─────────────────────────────────────────────────────────────────────

    /// Append a milestone to a case.
    pub fn create_milestone(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        params: &MilestoneCreateParams,
    ) -> Result<Milestone, CaseError> {
        let title = required_text(&params.title, "Title")?.to_string();
        let due_date = params
            .due_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(normalize_date)
            .transpose()?;
        let params = MilestoneCreateParams {
            title: title.clone(),
            description: params.description.clone(),
            due_date,
        };

        with_immediate(conn, |tx| {
            require_case(tx, case_id)?;
            let milestone = CaseRepository::insert_milestone(tx, case_id, &params)?;
            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind: ActivityKind::MilestoneAdded,
                    description: format!("Added milestone: {title}"),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({ "milestoneId": milestone.id })),
                },
            )?;
            Ok(milestone)
        })
    }

    /// Flip a milestone's completion.
    ///
    /// Case progress follows milestones only while the case has no workflow
    /// steps.
    pub fn toggle_milestone(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        milestone_id: &str,
    ) -> Result<Milestone, CaseError> {
        with_immediate(conn, |tx| {
            let current = CaseRepository::get_milestone(tx, case_id, milestone_id)?
                .ok_or_else(|| CaseError::milestone_not_found(milestone_id))?;

            let completed = !current.completed;
            let completed_at = completed.then(now_iso);
            let completed_by = completed.then_some(actor.user_id.as_str());
            let _ = CaseRepository::set_milestone_completed(
                tx,
                case_id,
                milestone_id,
                completed,
                completed_at.as_deref(),
                completed_by,
            )?;

            let (_, step_total) = CaseRepository::count_steps(tx, case_id)?;
            if step_total == 0 {
                let (done, total) = CaseRepository::count_milestones(tx, case_id)?;
                let _ = CaseRepository::set_progress(tx, case_id, compute_progress(done, total))?;
            }

            let (kind, verb) = if completed {
                (ActivityKind::MilestoneCompleted, "Completed")
            } else {
                (ActivityKind::MilestoneUncompleted, "Uncompleted")
            };
            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind,
                    description: format!("{verb} milestone: {}", current.title),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({
                        "milestoneId": milestone_id,
                        "completed": completed,
                    })),
                },
            )?;

            debug!(case_id, milestone_id, completed, "milestone toggled");
            CaseRepository::get_milestone(tx, case_id, milestone_id)?
                .ok_or_else(|| CaseError::milestone_not_found(milestone_id))
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Time entries
    // ─────────────────────────────────────────────────────────────────────

    /// Log time against a case and add it to the case's actual hours.
    pub fn log_time(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        params: &TimeEntryCreateParams,
    ) -> Result<TimeEntry, CaseError> {
        if !params.hours.is_finite() || params.hours < MIN_TIME_ENTRY_HOURS {
            return Err(CaseError::Validation(format!(
                "Hours must be at least {MIN_TIME_ENTRY_HOURS}"
            )));
        }
        if params.hourly_rate.is_some_and(|r| r < 0.0) {
            return Err(CaseError::Validation(
                "Hourly rate cannot be negative".to_string(),
            ));
        }
        let date = normalize_date(required_text(&params.date, "Date")?)?;
        let billable = params.billable.unwrap_or(true);
        let amount = billed_amount(params.hours, billable, params.hourly_rate);

        with_immediate(conn, |tx| {
            require_case(tx, case_id)?;
            let entry =
                CaseRepository::insert_time_entry(tx, case_id, &actor.user_id, params, &date, amount)?;
            let _ = CaseRepository::increment_actual_hours(tx, case_id, params.hours)?;
            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind: ActivityKind::TimeLogged,
                    description: format!("Logged {} hours", params.hours),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({
                        "hours": params.hours,
                        "billable": billable,
                        "amount": amount,
                    })),
                },
            )?;
            debug!(case_id, hours = params.hours, billable, "time logged");
            Ok(entry)
        })
    }

    /// Every time entry plus totals; "this week" is the Sunday–Saturday week
    /// containing `today`.
    pub fn list_time_entries(conn: &Connection, today: NaiveDate) -> Result<TimeSheet, CaseError> {
        let entries = CaseRepository::list_time_entries(conn)?;
        let (start, end) = week_bounds(today);
        let (start, end) = (
            start.format("%Y-%m-%d").to_string(),
            end.format("%Y-%m-%d").to_string(),
        );

        let mut stats = TimeStats::default();
        for item in &entries {
            let entry = &item.entry;
            stats.total_hours += entry.hours;
            if entry.billable {
                stats.billable_hours += entry.hours;
            }
            stats.total_amount += entry.amount.unwrap_or(0.0);
            if entry.date >= start && entry.date <= end {
                stats.entries_this_week += 1;
            }
        }

        Ok(TimeSheet { entries, stats })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Comments and legal references
    // ─────────────────────────────────────────────────────────────────────

    /// Post a comment on a case.
    pub fn add_comment(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        params: &CommentCreateParams,
    ) -> Result<Comment, CaseError> {
        let _ = required_text(&params.content, "Content")?;

        with_immediate(conn, |tx| {
            require_case(tx, case_id)?;
            let comment = CaseRepository::insert_comment(tx, case_id, &actor.user_id, params)?;
            let visibility = if comment.is_internal { "internal" } else { "public" };
            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind: ActivityKind::CommentAdded,
                    description: format!("Added a {visibility} comment"),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({ "commentId": comment.id })),
                },
            )?;
            Ok(comment)
        })
    }

    /// Attach a statute, precedent, or regulation to a case.
    pub fn add_legal_reference(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        params: &LegalReferenceCreateParams,
    ) -> Result<LegalReference, CaseError> {
        let title = required_text(&params.title, "Title")?.to_string();
        let _ = required_text(&params.citation, "Citation")?;
        let _ = required_text(&params.ref_type, "Type")?;

        with_immediate(conn, |tx| {
            require_case(tx, case_id)?;
            let reference =
                CaseRepository::insert_legal_reference(tx, case_id, &actor.user_id, params)?;
            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind: ActivityKind::LegalReferenceAdded,
                    description: format!("Added legal reference: {title}"),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({
                        "referenceId": reference.id,
                        "type": reference.ref_type,
                    })),
                },
            )?;
            Ok(reference)
        })
    }
}
