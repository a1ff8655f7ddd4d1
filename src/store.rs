//! Read-only view of the records the suggestion pipeline consumes.

use crate::contexts::ContextManager;
use crate::db::models::{ContextEntry, Task};
use crate::error::Result;
use crate::tasks::TaskManager;
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    async fn list_context_entries(&self) -> Result<Vec<ContextEntry>>;
}

/// `RecordStore` backed by the application's SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        TaskManager::new(&self.pool).list_tasks().await
    }

    async fn list_context_entries(&self) -> Result<Vec<ContextEntry>> {
        ContextManager::new(&self.pool).list_entries().await
    }
}
