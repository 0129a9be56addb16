//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use cinelog_core::{EntryId, MovieId, UserId};
use serde::Serialize;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub created_at: String,
}

impl User {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: UserId::from(row.get::<_, i64>(0)?),
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Movie
// ---------------------------------------------------------------------------

/// A shared movie record.  Metadata fields are `None` when the provider had
/// nothing usable for them; placeholder strings are never stored.
#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub imdb_link: Option<String>,
    pub created_at: String,
}

impl Movie {
    /// Build from a row selected as:
    /// id, name, director, year, rating, poster_url, imdb_link, created_at
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: MovieId::from(row.get::<_, i64>(0)?),
            name: row.get(1)?,
            director: row.get(2)?,
            year: row.get(3)?,
            rating: row.get(4)?,
            poster_url: row.get(5)?,
            imdb_link: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

// ---------------------------------------------------------------------------
// CollectionEntry
// ---------------------------------------------------------------------------

/// A user↔movie association carrying the user's personal overrides.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub user_title: Option<String>,
    pub user_rating: Option<f64>,
    pub user_notes: Option<String>,
    pub added_at: String,
}

impl CollectionEntry {
    /// Build from a row selected as:
    /// id, user_id, movie_id, user_title, user_rating, user_notes, added_at
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: EntryId::from(row.get::<_, i64>(0)?),
            user_id: UserId::from(row.get::<_, i64>(1)?),
            movie_id: MovieId::from(row.get::<_, i64>(2)?),
            user_title: row.get(3)?,
            user_rating: row.get(4)?,
            user_notes: row.get(5)?,
            added_at: row.get(6)?,
        })
    }
}

// ---------------------------------------------------------------------------
// MovieView
// ---------------------------------------------------------------------------

/// A collection entry merged with its movie record.
///
/// `title` is the effective display title: the user's override when set,
/// otherwise the shared movie name.  The raw override fields are carried
/// alongside so clients can distinguish "customized" from "inherited".
#[derive(Debug, Clone, Serialize)]
pub struct MovieView {
    pub entry_id: EntryId,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub title: String,
    pub name: String,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub imdb_link: Option<String>,
    pub user_title: Option<String>,
    pub user_rating: Option<f64>,
    pub user_notes: Option<String>,
    pub added_at: String,
}

impl MovieView {
    /// Build from a row selected as:
    /// um.id, um.user_id, um.movie_id, m.name, m.director, m.year, m.rating,
    /// m.poster_url, m.imdb_link, um.user_title, um.user_rating,
    /// um.user_notes, um.added_at
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let name: String = row.get(3)?;
        let user_title: Option<String> = row.get(9)?;
        Ok(Self {
            entry_id: EntryId::from(row.get::<_, i64>(0)?),
            user_id: UserId::from(row.get::<_, i64>(1)?),
            movie_id: MovieId::from(row.get::<_, i64>(2)?),
            title: user_title.clone().unwrap_or_else(|| name.clone()),
            name,
            director: row.get(4)?,
            year: row.get(5)?,
            rating: row.get(6)?,
            poster_url: row.get(7)?,
            imdb_link: row.get(8)?,
            user_title,
            user_rating: row.get(10)?,
            user_notes: row.get(11)?,
            added_at: row.get(12)?,
        })
    }

    /// Merge an entry with its movie record without another round-trip.
    pub fn merge(entry: &CollectionEntry, movie: &Movie) -> Self {
        Self {
            entry_id: entry.id,
            user_id: entry.user_id,
            movie_id: movie.id,
            title: entry
                .user_title
                .clone()
                .unwrap_or_else(|| movie.name.clone()),
            name: movie.name.clone(),
            director: movie.director.clone(),
            year: movie.year,
            rating: movie.rating,
            poster_url: movie.poster_url.clone(),
            imdb_link: movie.imdb_link.clone(),
            user_title: entry.user_title.clone(),
            user_rating: entry.user_rating,
            user_notes: entry.user_notes.clone(),
            added_at: entry.added_at.clone(),
        }
    }
}
