use axum::extract::State;

use crate::database::models::{Movie, User};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /movies - every movie document
pub async fn movies_list(State(state): State<AppState>) -> ApiResult<Vec<Movie>> {
    let movies = state.store.list_movies().await?;
    Ok(ApiResponse::ok(movies))
}

/// GET /users - every user document
pub async fn users_list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.store.list_users().await?;
    Ok(ApiResponse::ok(users))
}
