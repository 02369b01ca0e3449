use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::auth::hash_password;
use crate::database::models::{UpdateUserRequest, User, UserUpdate};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, TextResult};
use crate::state::AppState;

/// GET /users/:Username - one user document, `null` when absent
pub async fn user_get(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Option<User>> {
    let user = state.store.find_user(&username).await?;
    Ok(ApiResponse::ok(user))
}

/// PUT /users/:Username - overwrite only the supplied fields
///
/// A new Password is re-hashed before it is stored. Responds 201 with the updated
/// document, or `null` when no such user exists.
pub async fn user_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(username): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Option<User>> {
    let Json(payload) = payload?;
    let payload = payload.normalized();
    payload.validate()?;

    let password_hash = match payload.password.as_deref() {
        Some(plaintext) => Some(hash_password(plaintext, state.config.security.bcrypt_cost).await?),
        None => None,
    };

    let update = UserUpdate {
        username: payload.username,
        password_hash,
        email: payload.email,
        birthday: payload.birthday,
    };

    // Nothing to write: answer with the stored document as-is
    let user = if update.is_empty() {
        state.store.find_user(&username).await?
    } else {
        state.store.update_user(&username, update).await?
    };

    tracing::info!(
        actor = %auth.username,
        actor_id = %auth.user_id,
        "Updated user '{}' (found: {})",
        username,
        user.is_some()
    );
    Ok(ApiResponse::created(user))
}

/// DELETE /users/:Username - remove the account
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(username): Path<String>,
) -> TextResult {
    match state.store.delete_user(&username).await? {
        Some(_) => {
            tracing::info!(actor = %auth.username, actor_id = %auth.user_id, "Deleted user '{}'", username);
            Ok((StatusCode::OK, format!("{} was deleted.", username)))
        }
        None => Err(ApiError::not_found(format!("{} was not found", username))),
    }
}
