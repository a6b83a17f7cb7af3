use rusqlite::Connection;

use crate::repository::CaseRepository;
use crate::types::{Case, CaseCreateParams, Identity, User, UserCreateParams, UserRole};

pub(crate) fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    casebook_store::run_migrations(&conn).unwrap();
    conn
}

pub(crate) fn seed_user(conn: &Connection, email: &str) -> User {
    CaseRepository::create_user(
        conn,
        &UserCreateParams {
            email: email.to_string(),
            name: Some("Dana Counsel".to_string()),
            role: Some(UserRole::Lawyer),
            ..Default::default()
        },
    )
    .unwrap()
}

pub(crate) fn identity_for(user: &User) -> Identity {
    Identity {
        user_id: user.id.clone(),
        email: user.email.clone(),
        role: user.role,
    }
}

pub(crate) fn seed_case(conn: &Connection, user: &User, title: &str) -> Case {
    CaseRepository::create_case(
        conn,
        &CaseCreateParams {
            title: title.to_string(),
            ..Default::default()
        },
        &user.id,
    )
    .unwrap()
}
