//! Movie record operations.
//!
//! Movie rows are shared between users and keyed by a case-insensitive
//! unique name.  Rows are only ever removed through the orphan-cleanup
//! helpers once no collection entry references them.

use chrono::Utc;
use cinelog_core::{Error, MovieId, Result};
use rusqlite::Connection;

use crate::models::Movie;

/// Column list used in SELECT statements.
const COLS: &str = "id, name, director, year, rating, poster_url, imdb_link, created_at";

/// Create a new movie record.
pub fn create_movie(
    conn: &Connection,
    name: &str,
    director: Option<&str>,
    year: Option<i32>,
    rating: Option<f64>,
    poster_url: Option<&str>,
    imdb_link: Option<&str>,
) -> Result<Movie> {
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO movies (name, director, year, rating, poster_url, imdb_link, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![name, director, year, rating, poster_url, imdb_link, created_at],
    )
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            Error::Conflict(format!("Movie '{name}' already exists"))
        } else {
            Error::database(e.to_string())
        }
    })?;

    Ok(Movie {
        id: MovieId::from(conn.last_insert_rowid()),
        name: name.to_string(),
        director: director.map(String::from),
        year,
        rating,
        poster_url: poster_url.map(String::from),
        imdb_link: imdb_link.map(String::from),
        created_at,
    })
}

/// Get a movie by ID.
pub fn get_movie(conn: &Connection, id: MovieId) -> Result<Option<Movie>> {
    let q = format!("SELECT {COLS} FROM movies WHERE id = ?1");
    let result = conn.query_row(&q, [id.as_i64()], Movie::from_row);
    match result {
        Ok(m) => Ok(Some(m)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Find a movie by name, case-insensitively.
///
/// The comparison rides on the NOCASE collation of the `name` column, so
/// 'inception' finds 'Inception'.
pub fn find_movie_by_name(conn: &Connection, name: &str) -> Result<Option<Movie>> {
    let q = format!("SELECT {COLS} FROM movies WHERE name = ?1");
    let result = conn.query_row(&q, [name], Movie::from_row);
    match result {
        Ok(m) => Ok(Some(m)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List the most recently added movies, newest first.
///
/// Ordering by id matches creation order: ids are monotonic AUTOINCREMENT
/// values.
pub fn list_recent(conn: &Connection, limit: i64) -> Result<Vec<Movie>> {
    let q = format!("SELECT {COLS} FROM movies ORDER BY id DESC LIMIT ?1");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([limit], Movie::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a movie only if no collection entry references it.
///
/// The reference check and the delete are a single statement, so the guard
/// cannot race with a concurrent insert on the same connection's
/// transaction. Returns true if the row was removed.
pub fn delete_movie_if_orphaned(conn: &Connection, id: MovieId) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM movies WHERE id = ?1
             AND NOT EXISTS (SELECT 1 FROM user_movies WHERE movie_id = ?1)",
            [id.as_i64()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Delete every movie that no collection entry references.
///
/// Used after bulk entry removal (user deletion). Returns the number of
/// rows swept.
pub fn delete_orphaned_movies(conn: &Connection) -> Result<usize> {
    let n = conn
        .execute(
            "DELETE FROM movies WHERE id NOT IN (SELECT movie_id FROM user_movies)",
            [],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n)
}
