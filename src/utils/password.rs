use crate::error::AppError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Newtype for a raw password to prevent accidental logging.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Newtype for a stored password hash.
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash a password using Argon2id with a freshly generated salt. The salt
/// is embedded in the resulting PHC string.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, AppError> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(PasswordHashString::new(password_hash))
}

/// Verify a password against a stored hash. A malformed hash verifies as
/// false rather than surfacing a distinct error, so callers can keep the
/// login failure message uniform.
pub fn verify_password(password: &Password, password_hash: &PasswordHashString) -> bool {
    match PasswordHash::new(password_hash.as_str()) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_str().as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}
