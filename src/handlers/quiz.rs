// src/handlers/quiz.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::AppError,
    models::question::PublicQuestion,
    session::SessionState,
    state::AppState,
    utils::jwt::Claims,
};

/// DTO for submitting the current question's answer.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// May be empty or omitted, meaning "no selection". That submission is
    /// valid and simply counts as incorrect.
    #[serde(default)]
    pub selected_option: String,
}

/// Runs one engine call against the active session of the authenticated
/// user. Returns 404 when no session is active (or it belongs to someone
/// else after a later login replaced it).
fn with_session<T>(
    state: &AppState,
    claims: &Claims,
    op: impl FnOnce(&mut SessionState) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut guard = state.lock_session()?;
    let active = guard
        .as_mut()
        .filter(|active| active.username == claims.sub)
        .ok_or_else(|| AppError::NotFound("No active quiz session".to_string()))?;
    op(&mut active.state)
}

/// The quiz-screen payload: the question under the cursor (without answer
/// or explanation), the recorded selection if this index was already
/// submitted, and the progress ratio.
fn question_payload(session: &SessionState) -> Result<serde_json::Value, AppError> {
    let question = session.current_question()?;
    let recorded = session.answer_for(session.cursor());
    Ok(json!({
        "index": session.cursor(),
        "total": session.total(),
        "question": PublicQuestion::from(question),
        "selected": recorded.map(|e| e.selected_option.clone()),
        "answered": recorded.is_some(),
        "progress": session.progress(),
    }))
}

/// Returns the question under the cursor.
pub async fn current_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let payload = with_session(&state, &claims, |session| question_payload(session))?;
    Ok(Json(payload))
}

/// Moves one question back. A silent clamp at the first question, never an
/// error.
pub async fn previous_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let payload = with_session(&state, &claims, |session| {
        session.go_previous();
        question_payload(session)
    })?;
    Ok(Json(payload))
}

/// Moves one question forward, clamped at the last question.
pub async fn next_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let payload = with_session(&state, &claims, |session| {
        session.go_next();
        question_payload(session)
    })?;
    Ok(Json(payload))
}

/// Submits the answer for the current question and advances. Once the last
/// question is submitted the session is finalized and the client should
/// move on to the result screen.
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = with_session(&state, &claims, |session| {
        session.submit_answer(&payload.selected_option)?;
        Ok(json!({
            "finalized": session.is_finalized(),
            "index": session.cursor(),
            "progress": session.progress(),
        }))
    })?;
    Ok(Json(response))
}
