//! Password hashing for the resource's password field.

use crate::error::AppError;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2,
};
use rand::rngs::OsRng;

/// Parse `value` as a complete argon2 PHC string (algorithm, salt and hash all present).
fn parse_argon2(value: &str) -> Option<PasswordHash<'_>> {
    let parsed = PasswordHash::new(value).ok()?;
    Algorithm::try_from(parsed.algorithm).ok()?;
    if parsed.salt.is_none() || parsed.hash.is_none() {
        return None;
    }
    Some(parsed)
}

/// Whether `value` is already an argon2 hash. Plaintext that merely looks like one is not.
pub fn is_password_hash(value: &str) -> bool {
    parse_argon2(value).is_some()
}

/// Salted argon2 hash in PHC string form.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("password hash: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify against an argon2 PHC string, or compare exactly when the stored value is legacy plaintext.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    match parse_argon2(stored) {
        Some(parsed) => Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok(),
        None => plain == stored,
    }
}
