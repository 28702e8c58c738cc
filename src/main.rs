// src/main.rs

use dotenvy::dotenv;
use quiz_backend::config::Config;
use quiz_backend::models::question::QuestionBank;
use quiz_backend::routes;
use quiz_backend::state::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Open the SQLite database (created on first run)
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to open the quiz database");

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Load and validate the question catalog
    let bank = load_bank(&config);
    tracing::info!("Question bank loaded ({} questions)", bank.len());

    // Create AppState
    let state = AppState::new(pool, config, bank);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

fn load_bank(config: &Config) -> QuestionBank {
    let loaded = match &config.question_bank {
        Some(path) => {
            let raw = std::fs::read_to_string(path).unwrap_or_else(|e| {
                panic!("Failed to read question bank {}: {}", path.display(), e)
            });
            QuestionBank::from_json(&raw)
        }
        None => QuestionBank::builtin(),
    };
    loaded.unwrap_or_else(|e| panic!("Invalid question bank: {}", e))
}
