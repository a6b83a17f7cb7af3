//! Users and session lookup.

use rusqlite::{Connection, OptionalExtension, params};

use casebook_core::{IdPrefix, generate_id, now_iso};

use super::{CaseRepository, normalize_optional};
use crate::errors::CaseError;
use crate::types::{Identity, User, UserCreateParams, UserRole, UserSummary};

impl CaseRepository {
    // ─────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────

    /// Create a user.
    pub fn create_user(conn: &Connection, params: &UserCreateParams) -> Result<User, CaseError> {
        let id = generate_id(IdPrefix::User);
        let role = params.role.unwrap_or_default();
        let _ = conn.execute(
            "INSERT INTO users (id, email, name, first_name, last_name, role, active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
            params![
                id,
                params.email.trim(),
                normalize_optional(params.name.as_deref()),
                normalize_optional(params.first_name.as_deref()),
                normalize_optional(params.last_name.as_deref()),
                role.as_sql(),
                now_iso(),
            ],
        )?;
        Self::get_user(conn, &id)?.ok_or_else(|| CaseError::user_not_found(&id))
    }

    /// Get a user by ID.
    pub fn get_user(conn: &Connection, id: &str) -> Result<Option<User>, CaseError> {
        let user = conn
            .query_row(
                "SELECT id, email, name, first_name, last_name, role, active, created_at
                 FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Set whether a user may sign in. Returns `false` if the user is unknown.
    pub fn set_user_active(conn: &Connection, id: &str, active: bool) -> Result<bool, CaseError> {
        let changed = conn.execute(
            "UPDATE users SET active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        Ok(changed > 0)
    }

    /// Active users, newest first, with their assigned and opened case counts.
    pub fn list_active_users(conn: &Connection) -> Result<Vec<UserSummary>, CaseError> {
        let mut stmt = conn.prepare(
            "SELECT u.id, u.email, u.name, u.first_name, u.last_name, u.role, u.active,
                    u.created_at,
                    (SELECT COUNT(*) FROM cases c WHERE c.assigned_to_id = u.id)
                        AS assigned_cases,
                    (SELECT COUNT(*) FROM cases c WHERE c.created_by_id = u.id)
                        AS created_cases
             FROM users u
             WHERE u.active = 1
             ORDER BY u.created_at DESC, u.rowid DESC",
        )?;
        let users = stmt
            .query_map([], |row| {
                Ok(UserSummary {
                    user: user_from_row(row)?,
                    assigned_cases: row.get("assigned_cases")?,
                    created_cases: row.get("created_cases")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sessions
    // ─────────────────────────────────────────────────────────────────────

    /// Record a session token. Used by seeding and tests; issuance itself
    /// belongs to the external session provider.
    pub fn insert_session(
        conn: &Connection,
        token: &str,
        user_id: &str,
        expires_at: &str,
    ) -> Result<(), CaseError> {
        let _ = conn.execute(
            "INSERT OR REPLACE INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, expires_at],
        )?;
        Ok(())
    }

    /// Resolve a session token to the identity of an active user.
    ///
    /// Returns `None` for unknown or expired tokens and for deactivated users.
    /// `now` is an ISO 8601 UTC timestamp; expiry compares lexicographically.
    pub fn resolve_session(
        conn: &Connection,
        token: &str,
        now: &str,
    ) -> Result<Option<Identity>, CaseError> {
        let identity = conn
            .query_row(
                "SELECT u.id, u.email, u.role
                 FROM sessions s JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1 AND s.expires_at > ?2 AND u.active = 1",
                params![token, now],
                |row| {
                    let role: String = row.get(2)?;
                    Ok(Identity {
                        user_id: row.get(0)?,
                        email: row.get(1)?,
                        role: UserRole::from_sql(&role),
                    })
                },
            )
            .optional()?;
        Ok(identity)
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get("role")?;
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        name: row.get("name")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        role: UserRole::from_sql(&role),
        active: row.get("active")?,
        created_at: row.get("created_at")?,
    })
}

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::repository::test_support::{seed_case, seed_user, setup_db};
    use crate::types::CaseCreateParams;

    #[test]
    fn create_and_get_user() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        assert!(user.id.starts_with("user-"));
        assert_eq!(user.role, UserRole::Lawyer);
        assert!(user.active);

        let fetched = CaseRepository::get_user(&conn, &user.id).unwrap().unwrap();
        assert_eq!(fetched.email, "dana@firm.test");
    }

    #[test]
    fn duplicate_email_rejected() {
        let conn = setup_db();
        seed_user(&conn, "dana@firm.test");
        let err = CaseRepository::create_user(
            &conn,
            &UserCreateParams {
                email: "dana@firm.test".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, CaseError::Database(_)));
    }

    #[test]
    fn active_users_with_case_counts() {
        let conn = setup_db();
        let dana = seed_user(&conn, "dana@firm.test");
        let lee = seed_user(&conn, "lee@firm.test");
        let gone = seed_user(&conn, "gone@firm.test");
        CaseRepository::set_user_active(&conn, &gone.id, false).unwrap();

        seed_case(&conn, &dana, "A");
        seed_case(&conn, &dana, "B");
        CaseRepository::create_case(
            &conn,
            &CaseCreateParams {
                title: "C".to_string(),
                assigned_to_id: Some(lee.id.clone()),
                ..Default::default()
            },
            &dana.id,
        )
        .unwrap();

        let users = CaseRepository::list_active_users(&conn).unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.user.id != gone.id));

        let dana_row = users.iter().find(|u| u.user.id == dana.id).unwrap();
        assert_eq!(dana_row.created_cases, 3);
        assert_eq!(dana_row.assigned_cases, 0);
        let lee_row = users.iter().find(|u| u.user.id == lee.id).unwrap();
        assert_eq!(lee_row.created_cases, 0);
        assert_eq!(lee_row.assigned_cases, 1);
    }

    #[test]
    fn resolve_valid_session() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        CaseRepository::insert_session(&conn, "tok-1", &user.id, "2099-01-01T00:00:00Z").unwrap();

        let identity = CaseRepository::resolve_session(&conn, "tok-1", "2026-10-18T12:00:00Z")
            .unwrap()
            .unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.email, "dana@firm.test");
    }

    #[test]
    fn expired_session_is_rejected() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        CaseRepository::insert_session(&conn, "tok-1", &user.id, "2026-01-01T00:00:00Z").unwrap();
        let identity =
            CaseRepository::resolve_session(&conn, "tok-1", "2026-10-18T12:00:00Z").unwrap();
        assert!(identity.is_none());
    }

    #[test]
    fn inactive_user_session_is_rejected() {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        CaseRepository::insert_session(&conn, "tok-1", &user.id, "2099-01-01T00:00:00Z").unwrap();
        assert!(CaseRepository::set_user_active(&conn, &user.id, false).unwrap());
        let identity =
            CaseRepository::resolve_session(&conn, "tok-1", "2026-10-18T12:00:00Z").unwrap();
        assert!(identity.is_none());
    }

    #[test]
    fn unknown_token() {
        let conn = setup_db();
        let identity =
            CaseRepository::resolve_session(&conn, "nope", "2026-10-18T12:00:00Z").unwrap();
        assert!(identity.is_none());
    }
}
