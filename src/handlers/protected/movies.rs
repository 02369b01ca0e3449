use axum::extract::{Path, State};

use crate::database::models::{Director, Genre, Movie};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /movies/:Title - one movie by exact title, `null` when absent
pub async fn movie_get(State(state): State<AppState>, Path(title): Path<String>) -> ApiResult<Option<Movie>> {
    let movie = state.store.find_movie_by_title(&title).await?;
    Ok(ApiResponse::ok(movie))
}

/// GET /movies/genres/:Name - genre of the first movie filed under that genre name
pub async fn genre_get(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Option<Genre>> {
    let genre = state.store.find_genre(&name).await?;
    Ok(ApiResponse::ok(genre))
}

/// GET /movies/director/:Name - director record by name
pub async fn director_get(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Option<Director>> {
    let director = state.store.find_director(&name).await?;
    Ok(ApiResponse::ok(director))
}
