use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::app_error::{AppError, AppResult};

/// Hash a password into an Argon2id PHC string with a fresh random salt.
///
/// CPU-bound; run it off the async executor.
pub fn hash(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Returns `Ok(false)` on mismatch; only a malformed stored hash is an error.
pub fn verify(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("stored password hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash("p1").unwrap();
        assert!(hashed.starts_with("$argon2id$"));
        assert!(verify("p1", &hashed).unwrap());
        assert!(!verify("p2", &hashed).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash("same").unwrap(), hash("same").unwrap());
    }

    #[test]
    fn malformed_hash_is_internal_error() {
        assert!(matches!(
            verify("p1", "plaintext"),
            Err(AppError::Internal(_))
        ));
    }
}
