//! Helpers shared by CLI handlers

use crate::db::{create_pool, run_migrations};
use crate::error::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Open (creating if needed) and migrate the database at `path`
pub async fn open_database(path: &Path) -> Result<SqlitePool> {
    tracing::debug!("Opening database {}", path.display());
    let pool = create_pool(path).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
