use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
};
use serde::Serialize;

use crate::auth::{issue_token, verify_credentials, Claims};
use crate::database::models::{LoginRequest, UserProfile};
use crate::error::{ApiError, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub token: String,
}

/// POST /login - exchange username and password for a bearer token
///
/// Credentials may come from the JSON body or the query string; body fields win.
pub async fn login(
    State(state): State<AppState>,
    query: Result<Query<LoginRequest>, QueryRejection>,
    body: Bytes,
) -> ApiResult<LoginResponse> {
    let Query(from_query) = query?;

    let credentials = if body.is_empty() {
        from_query
    } else {
        let from_body: LoginRequest = serde_json::from_slice(&body)
            .map_err(|e| ApiError::unprocessable_entity(format!("Invalid login body: {}", e), FieldErrors::new()))?;
        from_query.merge(from_body)
    };

    let (Some(username), Some(password)) = (credentials.username, credentials.password) else {
        return Err(ApiError::unauthorized("Username and Password are required"));
    };

    let profile = verify_credentials(state.store.as_ref(), &username, &password)
        .await
        .map_err(|e| {
            tracing::warn!("Login failed for '{}': {}", username, e);
            ApiError::from(e)
        })?;

    let claims = Claims::new(&profile, state.config.security.jwt_expiry_hours)?;
    let token = issue_token(&claims, &state.config.security)?;

    tracing::info!("Issued token for '{}'", profile.username);
    Ok(ApiResponse::ok(LoginResponse { user: profile, token }))
}
