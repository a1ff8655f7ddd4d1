use anyhow::{Context, Result};
use axum::{http::Method, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::db::{create_pool, run_migrations};
use crate::llm::build_generator;
use crate::store::{RecordStore, SqliteStore};
use crate::suggestions::SuggestionFetcher;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub store: Arc<dyn RecordStore>,
    pub fetcher: SuggestionFetcher,
}

impl AppState {
    /// State over `pool` with the SQLite-backed record store
    pub fn new(db_pool: SqlitePool, fetcher: SuggestionFetcher) -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::new(db_pool.clone()));
        Self {
            db_pool,
            store,
            fetcher,
        }
    }
}

/// HTTP API server instance
pub struct ApiServer {
    config: AppConfig,
}

impl ApiServer {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Open the database, bind, and serve until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let db_pool = create_pool(&self.config.database)
            .await
            .context("Failed to open database")?;
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;

        let generator = build_generator(&self.config.llm)?;
        let fetcher = SuggestionFetcher::new(self.config.llm.api_key.clone(), generator);
        if !fetcher.is_configured() {
            tracing::warn!(
                "No {} API key configured; /api/ai-suggestions will return errors",
                self.config.llm.provider
            );
        }

        let app = create_router(AppState::new(db_pool, fetcher));

        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        tracing::info!("Smart To-Do API listening on {}", addr);
        tracing::info!("Database: {}", self.config.database.display());
        tracing::info!(
            "LLM provider: {} ({})",
            self.config.llm.provider,
            self.config.llm.model
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    use super::{handlers, routes};

    Router::new()
        .nest("/api", routes::api_routes())
        .fallback(handlers::not_found_handler)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
