// src/handlers/results.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Local;
use serde_json::json;

use crate::{
    certificate,
    error::AppError,
    models::result::{CertificateFields, ResultRecord},
    state::AppState,
    utils::jwt::Claims,
};

/// Compiles the finalized session of the authenticated user into a result
/// record; 409 while questions are still open, 404 without a session.
fn compile_result(state: &AppState, claims: &Claims) -> Result<ResultRecord, AppError> {
    let guard = state.lock_session()?;
    let active = guard
        .as_ref()
        .filter(|active| active.username == claims.sub)
        .ok_or_else(|| AppError::NotFound("No active quiz session".to_string()))?;
    ResultRecord::compile(&active.state)
}

/// The result screen: ordered per-question breakdown with the correct
/// answers and explanations, plus the aggregate score.
pub async fn quiz_results(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let result = compile_result(&state, &claims)?;
    Ok(Json(result))
}

/// Issues the certificate for the finalized session: renders the PDF,
/// writes it under the configured directory (overwriting any previous issue
/// for this user) and appends the score to the results log.
///
/// A failed write reports an error but leaves the session untouched, so the
/// client can retry. The session ends only after both the artifact and the
/// score record are in place.
pub async fn issue_certificate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let result = compile_result(&state, &claims)?;

    let fields = CertificateFields::new(&result, &claims.sub, Local::now().date_naive());
    let path = certificate::write(&state.config.certificate_dir, &fields)?;

    sqlx::query("INSERT INTO results (username, score) VALUES (?, ?)")
        .bind(&claims.sub)
        .bind(fields.score as i64)
        .execute(&state.pool)
        .await?;

    // The session is over once its certificate exists and the score is
    // logged. Guard against a newer login having replaced the slot.
    let mut guard = state.lock_session()?;
    if guard
        .as_ref()
        .is_some_and(|active| active.username == claims.sub)
    {
        guard.take();
    }
    drop(guard);

    tracing::info!(
        "Certificate for '{}' written to {}",
        claims.sub,
        path.display()
    );

    Ok(Json(json!({
        "file": path.display().to_string(),
        "score": fields.score,
        "total": fields.total,
        "passed": fields.passed,
        "message": "Your certificate has been saved successfully!"
    })))
}
