//! SQL DDL for the casebook tables.
//!
//! Creates `users`, `sessions`, `cases`, `workflow_steps`, `milestones`,
//! `time_entries`, `comments`, `legal_references`, and `activities`.
//! Every child table cascades on case deletion.

use rusqlite::Connection;
use tracing::debug;

use crate::errors::Result;

/// Run all schema migrations.
///
/// Idempotent; every statement uses `IF NOT EXISTS`.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    debug!("casebook schema ready");
    Ok(())
}

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT,
    first_name TEXT,
    last_name TEXT,
    role TEXT NOT NULL DEFAULT 'LAWYER'
        CHECK(role IN ('ADMIN', 'LAWYER', 'PARALEGAL', 'CLIENT')),
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

-- Filled by the external session provider; read-only here.
CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

CREATE TABLE IF NOT EXISTS cases (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'NEW'
        CHECK(status IN ('NEW', 'IN_PROGRESS', 'REVIEW', 'COMPLETED')),
    priority TEXT NOT NULL DEFAULT 'MEDIUM'
        CHECK(priority IN ('LOW', 'MEDIUM', 'HIGH', 'URGENT')),
    client_name TEXT,
    client_email TEXT,
    client_phone TEXT,
    created_by_id TEXT NOT NULL REFERENCES users(id),
    assigned_to_id TEXT REFERENCES users(id) ON DELETE SET NULL,
    progress INTEGER NOT NULL DEFAULT 0 CHECK(progress BETWEEN 0 AND 100),
    estimated_hours REAL,
    actual_hours REAL NOT NULL DEFAULT 0,
    due_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cases_status ON cases(status);
CREATE INDEX IF NOT EXISTS idx_cases_due ON cases(due_date) WHERE due_date IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_cases_created ON cases(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_cases_assignee ON cases(assigned_to_id);

CREATE TABLE IF NOT EXISTS workflow_steps (
    id TEXT PRIMARY KEY,
    case_id TEXT NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT,
    step_order INTEGER NOT NULL CHECK(step_order > 0),
    completed INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT,
    assigned_to_id TEXT REFERENCES users(id) ON DELETE SET NULL,
    estimated_hours REAL,
    due_date TEXT,
    dependencies TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_workflow_steps_case_order
    ON workflow_steps(case_id, step_order);

CREATE TABLE IF NOT EXISTS milestones (
    id TEXT PRIMARY KEY,
    case_id TEXT NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT,
    due_date TEXT,
    milestone_order INTEGER NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT,
    completed_by_id TEXT REFERENCES users(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_milestones_case_order
    ON milestones(case_id, milestone_order);

CREATE TABLE IF NOT EXISTS time_entries (
    id TEXT PRIMARY KEY,
    case_id TEXT NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id),
    description TEXT,
    hours REAL NOT NULL CHECK(hours > 0),
    date TEXT NOT NULL,
    billable INTEGER NOT NULL DEFAULT 1,
    hourly_rate REAL,
    amount REAL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_time_entries_case ON time_entries(case_id);
CREATE INDEX IF NOT EXISTS idx_time_entries_date ON time_entries(date DESC);

CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    case_id TEXT NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
    author_id TEXT NOT NULL REFERENCES users(id),
    content TEXT NOT NULL,
    is_internal INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_case ON comments(case_id, created_at DESC);

CREATE TABLE IF NOT EXISTS legal_references (
    id TEXT PRIMARY KEY,
    case_id TEXT NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
    added_by_id TEXT REFERENCES users(id) ON DELETE SET NULL,
    ref_type TEXT NOT NULL,
    title TEXT NOT NULL,
    citation TEXT NOT NULL,
    url TEXT,
    summary TEXT,
    relevance TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_legal_references_case ON legal_references(case_id);

-- Append-only audit trail. The type tag is open-ended, so no CHECK.
CREATE TABLE IF NOT EXISTS activities (
    id TEXT PRIMARY KEY,
    activity_type TEXT NOT NULL,
    description TEXT NOT NULL,
    user_id TEXT NOT NULL REFERENCES users(id),
    case_id TEXT REFERENCES cases(id) ON DELETE CASCADE,
    metadata TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_activities_case ON activities(case_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_activities_created ON activities(created_at DESC);

CREATE TRIGGER IF NOT EXISTS activities_append_only
BEFORE UPDATE ON activities
BEGIN
    SELECT RAISE(ABORT, 'activities are append-only');
END;
";
