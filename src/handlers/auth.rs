// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    error::AppError,
    models::user::{CredentialsRequest, User},
    session::SessionState,
    state::{ActiveSession, AppState},
    utils::{credentials, jwt::sign_jwt},
};

/// Uniform login failure: unknown user and wrong password are deliberately
/// not distinguished.
const LOGIN_FAILED: &str = "Invalid username or password.";

/// Registers a new user.
///
/// Both fields must be more than 5 characters; the password is hashed with
/// Argon2 before storage. Returns 201 Created, or 409 when the username is
/// taken (the existing account is untouched).
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    credentials::validate(&payload)?;

    let hashed_password = credentials::hash_password(&payload.password)?;

    sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
        .bind(&payload.username)
        .bind(&hashed_password)
        .execute(&state.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::Conflict(format!("Username '{}' already exists", payload.username))
            } else {
                tracing::error!("Failed to register user: {:?}", e);
                AppError::from(e)
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account created successfully!" })),
    ))
}

/// Authenticates a user, returns a JWT token and starts a fresh quiz
/// session for them.
///
/// A new pool of questions is sampled on every successful login; any
/// session left over from a previous login is discarded.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    credentials::validate(&payload)?;

    let user: Option<User> =
        sqlx::query_as("SELECT username, password, created_at FROM users WHERE username = ?")
            .bind(&payload.username)
            .fetch_optional(&state.pool)
            .await
            .map_err(|e| {
                tracing::error!("Login DB error: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

    let user = user.ok_or_else(|| AppError::AuthError(LOGIN_FAILED.to_string()))?;

    if !credentials::verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError(LOGIN_FAILED.to_string()));
    }

    let token = sign_jwt(
        &user.username,
        &state.config.jwt_secret,
        state.config.jwt_expiration,
    )?;

    let session = SessionState::start(&state.bank)?;
    *state.lock_session()? = Some(ActiveSession {
        username: user.username.clone(),
        state: session,
    });

    tracing::info!("User '{}' logged in, quiz session started", user.username);

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "message": "Welcome to the quiz!"
    })))
}
