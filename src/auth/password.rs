use super::AuthError;

/// One-way bcrypt hash of `plaintext`. The plaintext is never stored.
///
/// Runs on the blocking pool; a production cost keeps the CPU busy for a noticeable time.
pub async fn hash_password(plaintext: &str, cost: u32) -> Result<String, AuthError> {
    let plaintext = plaintext.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
    Ok(hash)
}

/// Compare `plaintext` against a stored bcrypt hash.
pub async fn verify_password(plaintext: &str, hash: &str) -> Result<bool, AuthError> {
    let plaintext = plaintext.to_owned();
    let hash = hash.to_owned();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn hash_differs_from_plaintext_and_verifies() {
        let hash = hash_password("popcorn", 4).await.unwrap();
        assert_ne!(hash, "popcorn");
        assert!(verify_password("popcorn", &hash).await.unwrap());
        assert!(!verify_password("nachos", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_differently() {
        let a = hash_password("popcorn", 4).await.unwrap();
        let b = hash_password("popcorn", 4).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        assert!(verify_password("popcorn", "not-a-bcrypt-hash").await.is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_runtime_free() {
        // On a single-threaded runtime the timer can only win if hashing is off-thread
        let hashed = tokio::select! {
            biased;
            result = hash_password("popcorn", 12) => Some(result.unwrap()),
            _ = tokio::time::sleep(Duration::from_millis(5)) => None,
        };
        assert!(hashed.is_none());
    }
}
