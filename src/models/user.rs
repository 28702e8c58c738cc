// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    /// Unique username, the table's primary key.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO carrying credentials, used by both registration and login.
/// Both fields must be more than 5 characters long.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(
        min = 6,
        max = 50,
        message = "Username must be more than 5 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be more than 5 characters."
    ))]
    pub password: String,
}
