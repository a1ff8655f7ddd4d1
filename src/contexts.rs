use crate::db::models::{ContextEntry, ContextEntryPatch, NewContextEntry};
use crate::error::{Result, TodoError};
use chrono::Utc;
use sqlx::SqlitePool;

const CONTEXT_COLUMNS: &str = "id, content, source_type, processed_insights, created_at";

pub struct ContextManager<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ContextManager<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All context entries, newest first
    pub async fn list_entries(&self) -> Result<Vec<ContextEntry>> {
        let entries = sqlx::query_as::<_, ContextEntry>(&format!(
            "SELECT {} FROM context_entries ORDER BY id DESC",
            CONTEXT_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn get_entry(&self, id: i64) -> Result<ContextEntry> {
        sqlx::query_as::<_, ContextEntry>(&format!(
            "SELECT {} FROM context_entries WHERE id = ?",
            CONTEXT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(TodoError::ContextNotFound(id))
    }

    pub async fn add_entry(&self, new: NewContextEntry) -> Result<ContextEntry> {
        validate_content(&new.content)?;

        let result = sqlx::query(
            r#"
            INSERT INTO context_entries (content, source_type, processed_insights, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&new.content)
        .bind(new.source_type)
        .bind(&new.processed_insights)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        let entry = self.get_entry(result.last_insert_rowid()).await?;
        tracing::info!(
            context_id = entry.id,
            source_type = %entry.source_type,
            "Context entry created"
        );
        Ok(entry)
    }

    pub async fn update_entry(&self, id: i64, patch: ContextEntryPatch) -> Result<ContextEntry> {
        let mut entry = self.get_entry(id).await?;

        if let Some(content) = patch.content {
            validate_content(&content)?;
            entry.content = content;
        }
        if let Some(source_type) = patch.source_type {
            entry.source_type = source_type;
        }
        if let Some(insights) = patch.processed_insights {
            entry.processed_insights = insights;
        }

        sqlx::query(
            "UPDATE context_entries SET content = ?, source_type = ?, processed_insights = ? WHERE id = ?",
        )
        .bind(&entry.content)
        .bind(entry.source_type)
        .bind(&entry.processed_insights)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn replace_entry(&self, id: i64, new: NewContextEntry) -> Result<ContextEntry> {
        self.update_entry(id, ContextEntryPatch::from(new)).await
    }

    pub async fn delete_entry(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM context_entries WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::ContextNotFound(id));
        }
        Ok(())
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(TodoError::InvalidInput(
            "Context content cannot be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::SourceType;
    use crate::test_utils::test_helpers::TestContext;

    fn entry(content: &str, source_type: SourceType) -> NewContextEntry {
        NewContextEntry {
            content: content.to_string(),
            source_type,
            processed_insights: String::new(),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_entries() {
        let ctx = TestContext::new().await;
        let manager = ContextManager::new(ctx.pool());

        manager
            .add_entry(entry("Project deadline is Friday", SourceType::Email))
            .await
            .unwrap();
        manager
            .add_entry(entry("Remember to call mom", SourceType::Note))
            .await
            .unwrap();

        let entries = manager.list_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "Remember to call mom");
        assert_eq!(entries[0].source_type, SourceType::Note);
        assert_eq!(entries[1].source_type, SourceType::Email);
    }

    #[tokio::test]
    async fn test_empty_content_rejected() {
        let ctx = TestContext::new().await;
        let manager = ContextManager::new(ctx.pool());

        let result = manager.add_entry(entry("  ", SourceType::Other)).await;
        assert!(matches!(result, Err(TodoError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_entry_insights() {
        let ctx = TestContext::new().await;
        let manager = ContextManager::new(ctx.pool());
        let created = manager
            .add_entry(entry("Standup moved to 10am", SourceType::Whatsapp))
            .await
            .unwrap();

        let updated = manager
            .update_entry(
                created.id,
                ContextEntryPatch {
                    processed_insights: Some("Meeting time change".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.content, "Standup moved to 10am");
        assert_eq!(updated.processed_insights, "Meeting time change");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let ctx = TestContext::new().await;
        let manager = ContextManager::new(ctx.pool());
        let created = manager
            .add_entry(entry("Temporary", SourceType::Other))
            .await
            .unwrap();

        manager.delete_entry(created.id).await.unwrap();
        assert!(matches!(
            manager.get_entry(created.id).await,
            Err(TodoError::ContextNotFound(_))
        ));
    }
}
