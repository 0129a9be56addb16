//! Collection and movie routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinelog_core::{EntryId, UserId};
use cinelog_db::models::{CollectionEntry, Movie, MovieView};
use serde::Deserialize;
use serde_json::json;

use super::error::AppError;
use super::AppContext;

/// How many movies the recent listing returns when no limit is given.
const DEFAULT_RECENT_LIMIT: u32 = 8;

#[derive(Debug, Deserialize)]
pub struct AddMovieRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

/// GET /api/users/:id/movies - list a user's collection
pub async fn list_user_movies(
    State(ctx): State<AppContext>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<MovieView>>, AppError> {
    // Resolve the user first so an unknown id is a 404, not an empty list.
    ctx.manager.get_user(user_id)?;
    Ok(Json(ctx.manager.list_user_movies(user_id)?))
}

/// POST /api/users/:id/movies - add a movie by title
pub async fn add_movie(
    State(ctx): State<AppContext>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<AddMovieRequest>,
) -> Result<(StatusCode, Json<MovieView>), AppError> {
    let view = ctx.manager.add_movie(user_id, &payload.title).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/collection/:id - fetch a single collection entry
pub async fn get_entry(
    State(ctx): State<AppContext>,
    Path(entry_id): Path<EntryId>,
) -> Result<Json<CollectionEntry>, AppError> {
    Ok(Json(ctx.manager.get_entry(entry_id)?))
}

/// PATCH /api/collection/:id - update an entry's override fields
pub async fn update_entry(
    State(ctx): State<AppContext>,
    Path(entry_id): Path<EntryId>,
    Json(fields): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Json<CollectionEntry>, AppError> {
    Ok(Json(ctx.manager.update_entry(entry_id, &fields)?))
}

/// DELETE /api/collection/:id - remove an entry (and an orphaned movie)
pub async fn delete_entry(
    State(ctx): State<AppContext>,
    Path(entry_id): Path<EntryId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = ctx.manager.delete_entry(entry_id)?;
    Ok(Json(json!({
        "message": "Movie removed from collection",
        "user_id": user_id,
    })))
}

/// GET /api/movies/recent - most recently added movies across all users
pub async fn recent_movies(
    State(ctx): State<AppContext>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<Movie>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    Ok(Json(ctx.manager.recent_movies(limit)?))
}
