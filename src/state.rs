// src/state.rs

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    config::Config, error::AppError, models::question::QuestionBank, session::SessionState,
};

/// The active quiz session and the user it belongs to.
#[derive(Debug)]
pub struct ActiveSession {
    pub username: String,
    pub state: SessionState,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub bank: Arc<QuestionBank>,

    /// The single session slot. Exactly one quiz session is active at a
    /// time; a fresh login replaces whatever was there.
    pub session: Arc<Mutex<Option<ActiveSession>>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config, bank: QuestionBank) -> Self {
        Self {
            pool,
            config,
            bank: Arc::new(bank),
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Engine calls are synchronous and never cross an await point, so a
    /// std mutex held for the duration of one call is enough.
    pub fn lock_session(&self) -> Result<MutexGuard<'_, Option<ActiveSession>>, AppError> {
        self.session
            .lock()
            .map_err(|_| AppError::InternalServerError("session lock poisoned".to_string()))
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
