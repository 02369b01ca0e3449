use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, TextResult};
use crate::state::AppState;

/// POST /users/:Username/movies/:MovieID - append to the favorite list (duplicates kept)
pub async fn favorite_add(
    State(state): State<AppState>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
) -> ApiResult<Option<User>> {
    let Path((username, movie_id)) = path?;
    let user = state.store.add_favorite(&username, movie_id).await?;
    tracing::debug!("Added {} to favorites of '{}'", movie_id, username);
    Ok(ApiResponse::ok(user))
}

/// DELETE /users/:Username/movies/:MovieID - drop every occurrence from the favorite list
pub async fn favorite_remove(
    State(state): State<AppState>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
) -> TextResult {
    let Path((username, movie_id)) = path?;
    state.store.remove_favorite(&username, movie_id).await?;
    Ok((
        StatusCode::OK,
        format!(
            "{} was successfully deleted from {}'s list of favorite movies.",
            movie_id, username
        ),
    ))
}
