//! Core types for case management.
//!
//! All serializable types use `camelCase` on the wire. Enum values use the
//! upper-case tags stored in the database (`IN_PROGRESS`, `URGENT`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Enums
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    /// Just opened.
    New,
    /// Actively worked on.
    InProgress,
    /// Awaiting review.
    Review,
    /// Closed.
    Completed,
}

impl CaseStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::New, Self::InProgress, Self::Review, Self::Completed];

    /// SQL string representation (matches the `CHECK` constraint values).
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Completed => "COMPLETED",
        }
    }

    fn from_sql(s: &str) -> Self {
        match s {
            "IN_PROGRESS" => Self::InProgress,
            "REVIEW" => Self::Review,
            "COMPLETED" => Self::Completed,
            _ => Self::New,
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Case priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CasePriority {
    /// Low priority.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// Elevated priority.
    High,
    /// Needs attention now.
    Urgent,
}

impl CasePriority {
    /// SQL string representation.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    fn from_sql(s: &str) -> Self {
        match s {
            "LOW" => Self::Low,
            "HIGH" => Self::High,
            "URGENT" => Self::Urgent,
            _ => Self::Medium,
        }
    }
}

impl std::fmt::Display for CasePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Role of a firm user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Firm administrator.
    Admin,
    /// Attorney.
    #[default]
    Lawyer,
    /// Paralegal staff.
    Paralegal,
    /// Client with portal access.
    Client,
}

impl UserRole {
    /// SQL string representation.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Lawyer => "LAWYER",
            Self::Paralegal => "PARALEGAL",
            Self::Client => "CLIENT",
        }
    }

    pub(crate) fn from_sql(s: &str) -> Self {
        match s {
            "ADMIN" => Self::Admin,
            "PARALEGAL" => Self::Paralegal,
            "CLIENT" => Self::Client,
            _ => Self::Lawyer,
        }
    }
}

/// Activity type tags written by this crate.
///
/// The stored column is free text, so readers see [`Activity::activity_type`]
/// as a plain string and tolerate tags written by other tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// A case was opened.
    CaseCreated,
    /// A case moved to another status.
    CaseStatusChanged,
    /// A workflow step was appended.
    WorkflowStepCreated,
    /// A workflow step was marked complete.
    WorkflowStepCompleted,
    /// A completed workflow step was reopened.
    WorkflowStepReopened,
    /// Workflow steps were renumbered.
    WorkflowReordered,
    /// A workflow step was removed.
    WorkflowStepDeleted,
    /// A milestone was appended.
    MilestoneAdded,
    /// A milestone was marked complete.
    MilestoneCompleted,
    /// A completed milestone was reopened.
    MilestoneUncompleted,
    /// Billable or non-billable time was recorded.
    TimeLogged,
    /// A comment was posted.
    CommentAdded,
    /// A statute or precedent was attached.
    LegalReferenceAdded,
}

impl ActivityKind {
    /// Stored tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CaseCreated => "case_created",
            Self::CaseStatusChanged => "case_status_changed",
            Self::WorkflowStepCreated => "workflow_step_created",
            Self::WorkflowStepCompleted => "workflow_step_completed",
            Self::WorkflowStepReopened => "workflow_step_reopened",
            Self::WorkflowReordered => "workflow_reordered",
            Self::WorkflowStepDeleted => "workflow_step_deleted",
            Self::MilestoneAdded => "milestone_added",
            Self::MilestoneCompleted => "milestone_completed",
            Self::MilestoneUncompleted => "milestone_uncompleted",
            Self::TimeLogged => "time_logged",
            Self::CommentAdded => "comment_added",
            Self::LegalReferenceAdded => "legal_reference_added",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// The authenticated actor behind a request.
///
/// Supplied by the session provider and passed into every mutating service
/// call; activity rows are attributed to `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// User ID.
    pub user_id: String,
    /// Login email.
    pub email: String,
    /// Role of the user.
    pub role: UserRole,
}

/// A firm user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique ID (`user-{uuid}`).
    pub id: String,
    /// Login email (unique).
    pub email: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Role.
    pub role: UserRole,
    /// Whether the account may sign in.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// Parameters for creating a user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserCreateParams {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Role (defaults to `LAWYER`).
    pub role: Option<UserRole>,
}

/// An active user with the number of cases they hold and opened.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// The user.
    #[serde(flatten)]
    pub user: User,
    /// Cases assigned to the user.
    pub assigned_cases: u32,
    /// Cases the user opened.
    pub created_cases: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cases
// ─────────────────────────────────────────────────────────────────────────────

/// A legal case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    /// Unique ID (`case-{uuid}`).
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: CaseStatus,
    /// Priority.
    pub priority: CasePriority,
    /// Client name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Client email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    /// Client phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    /// User who opened the case.
    pub created_by_id: String,
    /// Responsible user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
    /// Derived completion percentage (0–100).
    pub progress: u32,
    /// Budgeted hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    /// Hours logged so far.
    pub actual_hours: f64,
    /// Due date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

/// Parameters for opening a case.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseCreateParams {
    /// Title (required, trimmed).
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Priority (defaults to `MEDIUM`).
    pub priority: Option<CasePriority>,
    /// Client name.
    pub client_name: Option<String>,
    /// Client email.
    pub client_email: Option<String>,
    /// Client phone.
    pub client_phone: Option<String>,
    /// Responsible user.
    pub assigned_to_id: Option<String>,
    /// Budgeted hours.
    pub estimated_hours: Option<f64>,
    /// Due date, `YYYY-MM-DD` or RFC 3339.
    pub due_date: Option<String>,
}

/// Filter for listing cases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseFilter {
    /// Only cases in this status.
    pub status: Option<CaseStatus>,
    /// Only cases with this priority.
    pub priority: Option<CasePriority>,
    /// Only cases assigned to this user.
    pub assigned_to_id: Option<String>,
}

/// Case counts per status for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStats {
    /// Cases in `NEW`.
    #[serde(rename = "NEW")]
    pub new: u32,
    /// Cases in `IN_PROGRESS`.
    #[serde(rename = "IN_PROGRESS")]
    pub in_progress: u32,
    /// Cases in `REVIEW`.
    #[serde(rename = "REVIEW")]
    pub review: u32,
    /// Cases in `COMPLETED`.
    #[serde(rename = "COMPLETED")]
    pub completed: u32,
}

/// A case with everything it owns, for the detail view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetail {
    /// The case row.
    #[serde(flatten)]
    pub case: Case,
    /// Workflow steps in display order.
    pub workflow_steps: Vec<WorkflowStep>,
    /// Legacy milestones in display order.
    pub milestones: Vec<Milestone>,
    /// Time entries, newest date first.
    pub time_entries: Vec<TimeEntry>,
    /// Comments, newest first.
    pub comments: Vec<Comment>,
    /// Attached legal references.
    pub legal_references: Vec<LegalReference>,
    /// Most recent activity on the case.
    pub activities: Vec<Activity>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Workflow steps
// ─────────────────────────────────────────────────────────────────────────────

/// An ordered unit of work within a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    /// Unique ID (`step-{uuid}`).
    pub id: String,
    /// Owning case.
    pub case_id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display/execution position (positive).
    pub order: u32,
    /// Whether the step is done.
    pub completed: bool,
    /// When the step was completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Responsible user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
    /// Budgeted hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    /// Due date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// IDs of steps this one depends on. Recorded, not enforced.
    pub dependencies: Vec<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

/// Parameters for appending a workflow step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowStepCreateParams {
    /// Title (required).
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Responsible user.
    pub assigned_to_id: Option<String>,
    /// Budgeted hours.
    pub estimated_hours: Option<f64>,
    /// Due date (`YYYY-MM-DD` or RFC 3339).
    pub due_date: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Milestones
// ─────────────────────────────────────────────────────────────────────────────

/// A legacy ordered checkpoint, superseded by workflow steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Unique ID (`ms-{uuid}`).
    pub id: String,
    /// Owning case.
    pub case_id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Due date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Display position.
    pub order: u32,
    /// Whether the milestone is reached.
    pub completed: bool,
    /// When it was reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Who marked it reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_by_id: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Parameters for appending a milestone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MilestoneCreateParams {
    /// Title (required).
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Due date.
    pub due_date: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Time entries
// ─────────────────────────────────────────────────────────────────────────────

/// Hours logged against a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    /// Unique ID (`time-{uuid}`).
    pub id: String,
    /// Case the time was spent on.
    pub case_id: String,
    /// User who did the work.
    pub user_id: String,
    /// What was done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hours spent.
    pub hours: f64,
    /// Work date (`YYYY-MM-DD`).
    pub date: String,
    /// Whether the time is billed to the client.
    pub billable: bool,
    /// Hourly rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    /// `hours × hourly_rate` for billable entries with a rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Parameters for logging time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeEntryCreateParams {
    /// What was done.
    pub description: Option<String>,
    /// Hours spent (at least 0.25).
    pub hours: f64,
    /// Work date (`YYYY-MM-DD` or RFC 3339).
    pub date: String,
    /// Billable flag (defaults to `true`).
    pub billable: Option<bool>,
    /// Hourly rate.
    pub hourly_rate: Option<f64>,
}

/// A time entry with the names the time sheet shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryListItem {
    /// The entry.
    #[serde(flatten)]
    pub entry: TimeEntry,
    /// Title of the case.
    pub case_title: String,
    /// Display name of the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// Aggregate figures for the time sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStats {
    /// Sum of all hours.
    pub total_hours: f64,
    /// Sum of billable hours.
    pub billable_hours: f64,
    /// Sum of billable amounts.
    pub total_amount: f64,
    /// Entries dated within the current Sunday–Saturday week.
    pub entries_this_week: u32,
}

/// Response of the time sheet listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSheet {
    /// All entries, newest date first.
    pub entries: Vec<TimeEntryListItem>,
    /// Aggregates over `entries`.
    pub stats: TimeStats,
}

// ─────────────────────────────────────────────────────────────────────────────
// Comments and legal references
// ─────────────────────────────────────────────────────────────────────────────

/// A comment on a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique ID (`cmt-{uuid}`).
    pub id: String,
    /// Case commented on.
    pub case_id: String,
    /// Author.
    pub author_id: String,
    /// Body text.
    pub content: String,
    /// Hidden from the client when set.
    pub is_internal: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// Parameters for posting a comment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentCreateParams {
    /// Body text (required).
    pub content: String,
    /// Internal flag (defaults to `false`).
    pub is_internal: bool,
}

/// A statute, precedent, or regulation attached to a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalReference {
    /// Unique ID (`ref-{uuid}`).
    pub id: String,
    /// Case it is attached to.
    pub case_id: String,
    /// Who attached it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by_id: Option<String>,
    /// Kind of reference (`STATUTE`, `CASE_LAW`, ...).
    #[serde(rename = "type")]
    pub ref_type: String,
    /// Title.
    pub title: String,
    /// Formal citation.
    pub citation: String,
    /// Source link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Short summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Why it matters for the case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Parameters for attaching a legal reference.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegalReferenceCreateParams {
    /// Kind of reference.
    #[serde(rename = "type")]
    pub ref_type: String,
    /// Title (required).
    pub title: String,
    /// Citation (required).
    pub citation: String,
    /// Source link.
    pub url: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Why it matters.
    pub relevance: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Activity
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable audit-log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique ID (`act-{uuid}`).
    pub id: String,
    /// Type tag (`workflow_step_created`, ...).
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Human-readable description.
    pub description: String,
    /// Acting user.
    pub user_id: String,
    /// Case the activity concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    /// Free-form details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Parameters for appending an activity row.
#[derive(Debug, Clone)]
pub struct LogActivityParams {
    /// Type tag.
    pub kind: ActivityKind,
    /// Human-readable description.
    pub description: String,
    /// Acting user.
    pub user_id: String,
    /// Case the activity concerns.
    pub case_id: Option<String>,
    /// Free-form details.
    pub metadata: Option<Value>,
}

/// An activity joined with display names for the dashboard feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeedItem {
    /// The activity.
    #[serde(flatten)]
    pub activity: Activity,
    /// Display name of the actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Title of the case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_title: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar
// ─────────────────────────────────────────────────────────────────────────────

/// What a calendar event points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarEventKind {
    /// A case due date.
    Case,
    /// A milestone due date.
    Milestone,
}

/// A dated entry on the firm calendar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// ID of the case or milestone.
    pub id: String,
    /// Source of the event.
    #[serde(rename = "type")]
    pub kind: CalendarEventKind,
    /// Case or milestone title.
    pub title: String,
    /// Due date (`YYYY-MM-DD`).
    pub due_date: String,
    /// Owning case (the case itself for case events).
    pub case_id: String,
    /// Title of the owning case.
    pub case_title: String,
    /// Case status; case events only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    /// Case priority; case events only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<CasePriority>,
    /// Client name; case events only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Responsible user; case events only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
    /// Whether the milestone is done or the case is `COMPLETED`.
    pub completed: bool,
}

/// Inclusive date range of a calendar query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarPeriod {
    /// First day (`YYYY-MM-DD`).
    pub start: String,
    /// Last day (`YYYY-MM-DD`).
    pub end: String,
}

/// Events due within a period, in date order and grouped by day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    /// All events, earliest first.
    pub events: Vec<CalendarEvent>,
    /// The same events keyed by due date.
    pub events_by_date: BTreeMap<String, Vec<CalendarEvent>>,
    /// Number of events.
    pub total: usize,
    /// The queried range.
    pub period: CalendarPeriod,
}

pub(crate) fn case_status_from_sql(s: &str) -> CaseStatus {
    CaseStatus::from_sql(s)
}

pub(crate) fn case_priority_from_sql(s: &str) -> CasePriority {
    CasePriority::from_sql(s)
}
