#[cfg(test)]
pub mod test_helpers {
    use crate::db::{create_pool, run_migrations};
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    /// Migrated SQLite database in a temporary directory
    pub struct TestContext {
        pub pool: SqlitePool,
        pub _temp_dir: TempDir,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let db_path = temp_dir.path().join("smart-todo.db");

            let pool = create_pool(&db_path).await.unwrap();
            run_migrations(&pool).await.unwrap();

            Self {
                pool,
                _temp_dir: temp_dir,
            }
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.pool
        }
    }
}
