//! User provisioning for AfriMed Assist.
//!
//! Ensures a `users` row exists for an authenticated identity, creating it
//! with the default credit balance on first encounter. The identity is an
//! explicit value handed in by the caller (the server's identity
//! middleware), never an ambient lookup, so this crate is testable with no
//! authentication backend at all.

use afrimed_types::DEFAULT_STARTING_CREDITS;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display name used when the identity provider supplies no full name.
pub const UNNAMED_USER: &str = "Unnamed User";

/// Errors that can occur during user provisioning.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// The upsert completed but the row could not be read back. Indicates a
    /// concurrent delete or a broken schema, neither of which is expected.
    #[error("user row missing after provisioning: {0}")]
    RowMissing(String),
}

/// An authenticated identity as reported by the hosted identity provider.
///
/// Only the fields provisioning needs: the primary email (the unique key of
/// the `users` table) and an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Primary email address. Required; requests without one are rejected
    /// before provisioning is reached.
    pub email: String,
    /// Full display name, if the provider exposes one.
    pub name: Option<String>,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name,
        }
    }

    /// The display name to store: the provider's full name, or a fallback.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_USER)
    }
}

/// A provisioned user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Internal database ID.
    #[serde(skip_serializing, default)]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Primary email (unique).
    pub email: String,
    /// Remaining call credits.
    pub credits: i64,
    /// Creation timestamp (ISO 8601), set by SQLite.
    #[serde(skip_serializing, default)]
    pub created_at: String,
}

fn map_row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        credits: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Retrieves a user by primary email, if one exists.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, UserError> {
    conn.query_row(
        "SELECT id, name, email, credits, created_at FROM users WHERE email = ?1",
        [email],
        map_row_to_user,
    )
    .optional()
    .map_err(UserError::from)
}

/// Ensures a user row exists for the given identity and returns it.
///
/// The existing-row path is an idempotent read: nothing is written and the
/// row comes back unchanged. The first-visit path inserts
/// `{name, email, credits: 10}` with `ON CONFLICT(email) DO NOTHING`, so
/// two concurrent first visits for the same email converge on the single
/// row the `UNIQUE` constraint allows, and both callers get it from the
/// re-read.
pub fn find_or_create_user(conn: &Connection, identity: &Identity) -> Result<User, UserError> {
    if let Some(user) = get_user_by_email(conn, &identity.email)? {
        return Ok(user);
    }

    let inserted = conn.execute(
        "INSERT INTO users (name, email, credits) VALUES (?1, ?2, ?3)
         ON CONFLICT(email) DO NOTHING",
        params![
            identity.display_name(),
            identity.email,
            DEFAULT_STARTING_CREDITS
        ],
    )?;

    if inserted > 0 {
        tracing::info!(email = %identity.email, "provisioned new user");
    }

    get_user_by_email(conn, &identity.email)?
        .ok_or_else(|| UserError::RowMissing(identity.email.clone()))
}

/// Total number of user rows. Used by tests to assert no duplicate inserts.
pub fn count_users(conn: &Connection) -> Result<i64, UserError> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .map_err(UserError::from)
}
