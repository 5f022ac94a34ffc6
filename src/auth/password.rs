use crate::error::ForgeError;
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

/// Hash a password into an Argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ForgeError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ForgeError::PasswordHash(e.to_string()))
}

/// Verify a password against a stored PHC string.
/// A mismatch is reported as `InvalidCredentials`, indistinguishable from an
/// unknown email at the call site.
pub fn verify_password(password: &str, stored: &str) -> Result<(), ForgeError> {
    let parsed = PasswordHash::new(stored).map_err(|e| ForgeError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ForgeError::InvalidCredentials)
}
