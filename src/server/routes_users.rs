//! User management routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinelog_core::UserId;
use cinelog_db::models::User;
use serde::Deserialize;
use serde_json::json;

use super::error::AppError;
use super::AppContext;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

/// GET /api/users - list all users
pub async fn list_users(State(ctx): State<AppContext>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(ctx.manager.list_users()?))
}

/// POST /api/users - create a new user
pub async fn create_user(
    State(ctx): State<AppContext>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = ctx.manager.add_user(&payload.name)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:id - fetch a single user
pub async fn get_user(
    State(ctx): State<AppContext>,
    Path(user_id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    Ok(Json(ctx.manager.get_user(user_id)?))
}

/// DELETE /api/users/:id - delete a user and their collection
pub async fn delete_user(
    State(ctx): State<AppContext>,
    Path(user_id): Path<UserId>,
) -> Result<Json<serde_json::Value>, AppError> {
    ctx.manager.delete_user(user_id)?;
    Ok(Json(json!({
        "message": format!("User {} deleted", user_id),
    })))
}
