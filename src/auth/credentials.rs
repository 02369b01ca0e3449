use super::{password::verify_password, AuthError};
use crate::database::models::UserProfile;
use crate::database::Store;

/// Look up `username` and check `password` against the stored hash.
///
/// Unknown users and wrong passwords both yield `AuthError::InvalidCredentials`.
pub async fn verify_credentials(
    store: &dyn Store,
    username: &str,
    password: &str,
) -> Result<UserProfile, AuthError> {
    let user = store
        .find_user(username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &user.password).await? {
        tracing::debug!("Password mismatch for user '{}'", username);
        return Err(AuthError::InvalidCredentials);
    }

    Ok(UserProfile::from(user))
}
