// src/config.rs

use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,

    /// Directory certificates are written into.
    pub certificate_dir: PathBuf,

    /// Optional path to a question bank JSON file. The embedded catalog is
    /// used when unset.
    pub question_bank: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://quiz_app.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let certificate_dir = env::var("CERTIFICATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let question_bank = env::var("QUESTION_BANK").ok().map(PathBuf::from);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            certificate_dir,
            question_bank,
        }
    }
}
