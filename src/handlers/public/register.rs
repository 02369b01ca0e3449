use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use crate::auth::hash_password;
use crate::database::models::{NewUser, RegisterRequest, User};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /users - register a new account
///
/// Validation runs before anything touches the store. The insert itself is conditional
/// on the username being free, so a taken name comes back as 400 without a second query.
pub async fn user_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(payload) = payload?;

    if let Err(errors) = payload.validate() {
        tracing::debug!("Registration rejected: {}", errors);
        return Err(errors.into());
    }

    let password_hash = hash_password(&payload.password, state.config.security.bcrypt_cost).await?;

    let user = state
        .store
        .create_user(NewUser {
            username: payload.username,
            password_hash,
            email: payload.email,
            birthday: payload.birthday,
        })
        .await?;

    tracing::info!("Registered user '{}'", user.username);
    Ok(ApiResponse::created(user))
}
