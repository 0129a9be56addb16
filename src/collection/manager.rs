//! High-level operations on users and their movie collections.
//!
//! [`CollectionManager`] owns the connection pool and the metadata provider
//! and is the only place that composes query functions into transactions.
//! Route handlers call it and translate the returned errors into HTTP.

use std::sync::Arc;

use cinelog_core::{EntryId, Error, Result, UserId};
use cinelog_db::models::{CollectionEntry, Movie, MovieView, User};
use cinelog_db::pool::{get_conn, DbPool};
use cinelog_db::queries::{collection, movies, users};
use serde_json::Value;

use crate::metadata::MovieMetadataProvider;

/// Entry fields that a partial update may touch.
const UPDATABLE_FIELDS: &[&str] = &["title", "rating", "notes"];

/// Personal ratings live on a 1-10 scale, distinct from the provider's
/// aggregate rating stored on the movie record.
const RATING_MIN: f64 = 1.0;
const RATING_MAX: f64 = 10.0;

/// Coordinates users, shared movie records, and collection entries.
pub struct CollectionManager {
    db: DbPool,
    fetcher: Arc<dyn MovieMetadataProvider>,
}

impl CollectionManager {
    pub fn new(db: DbPool, fetcher: Arc<dyn MovieMetadataProvider>) -> Self {
        Self { db, fetcher }
    }

    // --- users ---

    /// List all users, sorted by name.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = get_conn(&self.db)?;
        users::list_users(&conn)
    }

    /// Fetch a single user.
    pub fn get_user(&self, id: UserId) -> Result<User> {
        let conn = get_conn(&self.db)?;
        users::get_user_by_id(&conn, id)?.ok_or_else(|| Error::not_found("user", id))
    }

    /// Create a user. Names are trimmed and must be non-empty and unique.
    pub fn add_user(&self, name: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("User name cannot be empty".to_string()));
        }

        let conn = get_conn(&self.db)?;
        let user = users::create_user(&conn, name)?;
        tracing::info!(user_id = %user.id, name = %user.name, "Created user");
        Ok(user)
    }

    /// Delete a user together with their collection entries, then sweep
    /// movies nobody references anymore. Runs as one transaction.
    pub fn delete_user(&self, id: UserId) -> Result<()> {
        let conn = get_conn(&self.db)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        if !users::delete_user(&tx, id)? {
            return Err(Error::not_found("user", id));
        }
        let swept = movies::delete_orphaned_movies(&tx)?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::info!(user_id = %id, swept_movies = swept, "Deleted user");
        Ok(())
    }

    // --- collection ---

    /// List a user's collection as merged views, oldest entry first.
    pub fn list_user_movies(&self, user_id: UserId) -> Result<Vec<MovieView>> {
        let conn = get_conn(&self.db)?;
        collection::list_for_user(&conn, user_id)
    }

    /// Fetch a single collection entry.
    pub fn get_entry(&self, id: EntryId) -> Result<CollectionEntry> {
        let conn = get_conn(&self.db)?;
        collection::get_entry(&conn, id)?.ok_or_else(|| Error::not_found("collection entry", id))
    }

    /// Add a movie to a user's collection by title.
    ///
    /// A title already known to the database (the comparison is
    /// case-insensitive) links the existing movie record without calling the
    /// provider. Otherwise metadata is fetched first, and the movie row plus
    /// the entry are inserted in one transaction, so a failed fetch or a
    /// conflicting entry never leaves a movie row behind.
    pub async fn add_movie(&self, user_id: UserId, title: &str) -> Result<MovieView> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Movie title cannot be empty".to_string()));
        }

        // First round trip: resolve the user and try the known movie records.
        // The pooled connection must not be held across the fetch await.
        {
            let conn = get_conn(&self.db)?;
            if users::get_user_by_id(&conn, user_id)?.is_none() {
                return Err(Error::not_found("user", user_id));
            }
            if let Some(movie) = movies::find_movie_by_name(&conn, title)? {
                let entry = link_movie(&conn, user_id, &movie)?;
                tracing::info!(user_id = %user_id, movie_id = %movie.id, "Linked existing movie");
                return Ok(MovieView::merge(&entry, &movie));
            }
        }

        // Unknown title: ask the provider before touching storage.
        let fetched = self
            .fetcher
            .fetch(title)
            .await
            .map_err(|e| Error::Metadata(e.to_string()))?;

        // Second round trip: insert movie and entry atomically. The lookup
        // runs again under the transaction because the provider may have
        // canonicalized the title and a concurrent request may have won.
        let conn = get_conn(&self.db)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        let movie = match movies::find_movie_by_name(&tx, &fetched.name)? {
            Some(existing) => existing,
            None => movies::create_movie(
                &tx,
                &fetched.name,
                fetched.director.as_deref(),
                fetched.year,
                fetched.rating,
                fetched.poster_url.as_deref(),
                fetched.imdb_link.as_deref(),
            )?,
        };
        let entry = link_movie(&tx, user_id, &movie)?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::info!(user_id = %user_id, movie_id = %movie.id, name = %movie.name, "Added movie");
        Ok(MovieView::merge(&entry, &movie))
    }

    /// Apply a partial update to an entry's override fields.
    ///
    /// Every key is checked against the updatable set before anything is
    /// parsed or written; a single unknown key rejects the whole request.
    pub fn update_entry(
        &self,
        id: EntryId,
        fields: &serde_json::Map<String, Value>,
    ) -> Result<CollectionEntry> {
        for key in fields.keys() {
            if !UPDATABLE_FIELDS.contains(&key.as_str()) {
                return Err(Error::Validation(format!(
                    "Unknown field '{}' (updatable fields: {})",
                    key,
                    UPDATABLE_FIELDS.join(", ")
                )));
            }
        }

        let conn = get_conn(&self.db)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        let mut entry = collection::get_entry(&tx, id)?
            .ok_or_else(|| Error::not_found("collection entry", id))?;

        if let Some(value) = fields.get("title") {
            entry.user_title = parse_text_field(value, "title")?;
        }
        if let Some(value) = fields.get("rating") {
            entry.user_rating = parse_rating_field(value)?;
        }
        if let Some(value) = fields.get("notes") {
            entry.user_notes = parse_text_field(value, "notes")?;
        }

        collection::update_overrides(
            &tx,
            id,
            entry.user_title.as_deref(),
            entry.user_rating,
            entry.user_notes.as_deref(),
        )?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;
        Ok(entry)
    }

    /// Remove an entry and, when it held the last reference, its movie.
    /// Returns the id of the user who owned the entry.
    pub fn delete_entry(&self, id: EntryId) -> Result<UserId> {
        let conn = get_conn(&self.db)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        let entry = collection::get_entry(&tx, id)?
            .ok_or_else(|| Error::not_found("collection entry", id))?;
        collection::delete_entry(&tx, id)?;
        let movie_removed = movies::delete_movie_if_orphaned(&tx, entry.movie_id)?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::info!(
            entry_id = %id,
            user_id = %entry.user_id,
            movie_removed,
            "Removed collection entry"
        );
        Ok(entry.user_id)
    }

    // --- movies ---

    /// Most recently created movie records across all users.
    pub fn recent_movies(&self, limit: u32) -> Result<Vec<Movie>> {
        let conn = get_conn(&self.db)?;
        movies::list_recent(&conn, i64::from(limit))
    }
}

/// Insert an entry linking `movie` into `user_id`'s collection, seeding the
/// personal title from the movie name.
fn link_movie(
    conn: &rusqlite::Connection,
    user_id: UserId,
    movie: &Movie,
) -> Result<CollectionEntry> {
    if collection::find_entry(conn, user_id, movie.id)?.is_some() {
        return Err(Error::Conflict(format!(
            "'{}' is already in this user's collection",
            movie.name
        )));
    }
    collection::create_entry(conn, user_id, movie.id, Some(&movie.name))
}

/// Interpret a JSON value for the title/notes overrides. `null` and blank
/// strings clear the override.
fn parse_text_field(value: &Value, field: &str) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        _ => Err(Error::Validation(format!(
            "Field '{}' must be a string or null",
            field
        ))),
    }
}

/// Interpret a JSON value for the rating override. `null` clears it; numbers
/// must be on the personal rating scale.
fn parse_rating_field(value: &Value) -> Result<Option<f64>> {
    let rating = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::Validation("Field 'rating' must be a number or null".to_string()))?,
        _ => {
            return Err(Error::Validation(
                "Field 'rating' must be a number or null".to_string(),
            ))
        }
    };

    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(Error::Validation(format!(
            "Field 'rating' must be between {} and {}",
            RATING_MIN, RATING_MAX
        )));
    }
    Ok(Some(rating))
}
