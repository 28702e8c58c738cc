// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, quiz, results},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Auth routes are open; every quiz route requires a Bearer token.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, question bank, session slot).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let quiz_routes = Router::new()
        .route("/current", get(quiz::current_question))
        .route("/previous", post(quiz::previous_question))
        .route("/next", post(quiz::next_question))
        .route("/submit", post(quiz::submit_answer))
        .route("/results", get(results::quiz_results))
        .route("/certificate", post(results::issue_certificate))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/quiz", quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
