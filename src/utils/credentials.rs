// src/utils/credentials.rs

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use validator::Validate;

use crate::{error::AppError, models::user::CredentialsRequest};

/// Applies the minimum-length policy (both fields longer than 5 characters)
/// before anything touches the store. Nothing is mutated on failure.
pub fn validate(request: &CredentialsRequest) -> Result<(), AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Salted Argon2 hash for storage. The observable contract stays an
/// exact-match verify of the original plaintext.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
