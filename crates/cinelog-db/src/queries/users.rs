//! User CRUD operations.

use chrono::Utc;
use cinelog_core::{Error, Result, UserId};
use rusqlite::Connection;

use crate::models::User;

/// Create a new user and return it.
pub fn create_user(conn: &Connection, name: &str) -> Result<User> {
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO users (name, created_at) VALUES (?1, ?2)",
        rusqlite::params![name, created_at],
    )
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            Error::Conflict(format!("User '{name}' already exists"))
        } else {
            Error::database(e.to_string())
        }
    })?;

    Ok(User {
        id: UserId::from(conn.last_insert_rowid()),
        name: name.to_string(),
        created_at,
    })
}

/// Get a user by primary key.
pub fn get_user_by_id(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, name, created_at FROM users WHERE id = ?1",
        [id.as_i64()],
        User::from_row,
    );
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all users ordered by name.
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn
        .prepare("SELECT id, name, created_at FROM users ORDER BY name ASC")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], User::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a user by ID. Returns true if a row was deleted.
///
/// The FK cascade removes the user's collection entries in the same
/// statement; sweeping movies left without any entry is the caller's job.
pub fn delete_user(conn: &Connection, id: UserId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM users WHERE id = ?1", [id.as_i64()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
