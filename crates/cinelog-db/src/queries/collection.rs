//! Collection entry operations (the user↔movie association table).

use chrono::Utc;
use cinelog_core::{EntryId, Error, MovieId, Result, UserId};
use rusqlite::Connection;

use crate::models::{CollectionEntry, MovieView};

const COLS: &str = "id, user_id, movie_id, user_title, user_rating, user_notes, added_at";

/// Column list for the entry-joined-with-movie view.
const VIEW_COLS: &str = "um.id, um.user_id, um.movie_id, m.name, m.director, m.year, m.rating,
    m.poster_url, m.imdb_link, um.user_title, um.user_rating, um.user_notes, um.added_at";

/// Create a collection entry linking a user to a movie.
pub fn create_entry(
    conn: &Connection,
    user_id: UserId,
    movie_id: MovieId,
    user_title: Option<&str>,
) -> Result<CollectionEntry> {
    let added_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO user_movies (user_id, movie_id, user_title, added_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![user_id.as_i64(), movie_id.as_i64(), user_title, added_at],
    )
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            Error::Conflict("Movie is already in this user's collection".to_string())
        } else {
            Error::database(e.to_string())
        }
    })?;

    Ok(CollectionEntry {
        id: EntryId::from(conn.last_insert_rowid()),
        user_id,
        movie_id,
        user_title: user_title.map(String::from),
        user_rating: None,
        user_notes: None,
        added_at,
    })
}

/// Get a collection entry by primary key.
pub fn get_entry(conn: &Connection, id: EntryId) -> Result<Option<CollectionEntry>> {
    let q = format!("SELECT {COLS} FROM user_movies WHERE id = ?1");
    let result = conn.query_row(&q, [id.as_i64()], CollectionEntry::from_row);
    match result {
        Ok(e) => Ok(Some(e)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Find the entry linking a user to a movie, if any.
pub fn find_entry(
    conn: &Connection,
    user_id: UserId,
    movie_id: MovieId,
) -> Result<Option<CollectionEntry>> {
    let q = format!("SELECT {COLS} FROM user_movies WHERE user_id = ?1 AND movie_id = ?2");
    let result = conn.query_row(
        &q,
        rusqlite::params![user_id.as_i64(), movie_id.as_i64()],
        CollectionEntry::from_row,
    );
    match result {
        Ok(e) => Ok(Some(e)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List a user's collection as merged views, in the order entries were added.
pub fn list_for_user(conn: &Connection, user_id: UserId) -> Result<Vec<MovieView>> {
    let q = format!(
        "SELECT {VIEW_COLS} FROM user_movies um
         JOIN movies m ON m.id = um.movie_id
         WHERE um.user_id = ?1
         ORDER BY um.id ASC"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([user_id.as_i64()], MovieView::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Overwrite the three override columns of an entry.
///
/// Callers pass the full desired state; a `None` stores NULL and the view
/// falls back to the shared movie data. Returns true if the entry existed.
pub fn update_overrides(
    conn: &Connection,
    id: EntryId,
    user_title: Option<&str>,
    user_rating: Option<f64>,
    user_notes: Option<&str>,
) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE user_movies SET user_title = ?1, user_rating = ?2, user_notes = ?3
             WHERE id = ?4",
            rusqlite::params![user_title, user_rating, user_notes, id.as_i64()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Delete a collection entry by ID. Returns true if a row was deleted.
pub fn delete_entry(conn: &Connection, id: EntryId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM user_movies WHERE id = ?1", [id.as_i64()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::{movies, users};

    fn setup() -> (crate::pool::PooledConnection, UserId, MovieId) {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let user = users::create_user(&conn, "alice").unwrap();
        let movie = movies::create_movie(
            &conn,
            "Inception",
            Some("Christopher Nolan"),
            Some(2010),
            Some(8.8),
            None,
            None,
        )
        .unwrap();
        (conn, user.id, movie.id)
    }

    #[test]
    fn create_and_find() {
        let (conn, uid, mid) = setup();
        let entry = create_entry(&conn, uid, mid, Some("Inception")).unwrap();
        assert_eq!(entry.user_title.as_deref(), Some("Inception"));
        assert_eq!(entry.user_rating, None);

        let found = find_entry(&conn, uid, mid).unwrap().unwrap();
        assert_eq!(found.id, entry.id);
        let by_id = get_entry(&conn, entry.id).unwrap().unwrap();
        assert_eq!(by_id.movie_id, mid);
    }

    #[test]
    fn duplicate_pair_conflict() {
        let (conn, uid, mid) = setup();
        create_entry(&conn, uid, mid, None).unwrap();
        let err = create_entry(&conn, uid, mid, None).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn list_merges_movie_data() {
        let (conn, uid, mid) = setup();
        create_entry(&conn, uid, mid, None).unwrap();
        let second = movies::create_movie(&conn, "Heat", None, Some(1995), None, None, None)
            .unwrap();
        let e2 = create_entry(&conn, uid, second.id, None).unwrap();
        update_overrides(&conn, e2.id, Some("Heat (rewatch)"), Some(9.5), None).unwrap();

        let views = list_for_user(&conn, uid).unwrap();
        assert_eq!(views.len(), 2);
        // First entry inherits the movie name and provider data.
        assert_eq!(views[0].title, "Inception");
        assert_eq!(views[0].director.as_deref(), Some("Christopher Nolan"));
        // Second entry shows the override but keeps the base name.
        assert_eq!(views[1].title, "Heat (rewatch)");
        assert_eq!(views[1].name, "Heat");
        assert_eq!(views[1].user_rating, Some(9.5));
    }

    #[test]
    fn overwrite_and_clear_overrides() {
        let (conn, uid, mid) = setup();
        let entry = create_entry(&conn, uid, mid, None).unwrap();

        assert!(update_overrides(&conn, entry.id, Some("Mine"), Some(7.0), Some("notes")).unwrap());
        let updated = get_entry(&conn, entry.id).unwrap().unwrap();
        assert_eq!(updated.user_title.as_deref(), Some("Mine"));
        assert_eq!(updated.user_rating, Some(7.0));

        assert!(update_overrides(&conn, entry.id, None, None, None).unwrap());
        let cleared = get_entry(&conn, entry.id).unwrap().unwrap();
        assert_eq!(cleared.user_title, None);
        assert_eq!(cleared.user_notes, None);

        assert!(!update_overrides(&conn, EntryId::from(9999), None, None, None).unwrap());
    }

    #[test]
    fn delete() {
        let (conn, uid, mid) = setup();
        let entry = create_entry(&conn, uid, mid, None).unwrap();
        assert!(delete_entry(&conn, entry.id).unwrap());
        assert!(get_entry(&conn, entry.id).unwrap().is_none());
        assert!(!delete_entry(&conn, entry.id).unwrap());
    }
}
