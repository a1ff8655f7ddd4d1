use crate::db::models::{Category, CategoryPatch, NewCategory};
use crate::error::{Result, TodoError};
use sqlx::SqlitePool;

const MAX_NAME_LEN: usize = 100;

pub struct CategoryManager<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryManager<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All categories ordered by name
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, usage_count FROM categories ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn find_category(&self, id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, usage_count FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, usage_count FROM categories WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    pub async fn get_category(&self, id: i64) -> Result<Category> {
        self.find_category(id)
            .await?
            .ok_or(TodoError::CategoryNotFound(id))
    }

    pub async fn add_category(&self, new: NewCategory) -> Result<Category> {
        let name = validate_name(&new.name)?;
        validate_usage_count(new.usage_count)?;
        self.check_name_free(name, None).await?;

        let category = self.insert_row(name, &new).await?;
        tracing::info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn update_category(&self, id: i64, patch: CategoryPatch) -> Result<Category> {
        let mut category = self.get_category(id).await?;

        if let Some(name) = patch.name {
            let name = validate_name(&name)?;
            self.check_name_free(name, Some(id)).await?;
            category.name = name.to_string();
        }
        if let Some(description) = patch.description {
            category.description = description;
        }
        if let Some(usage_count) = patch.usage_count {
            validate_usage_count(usage_count)?;
            category.usage_count = usage_count;
        }

        self.update_row(&category).await?;
        Ok(category)
    }

    pub async fn replace_category(&self, id: i64, new: NewCategory) -> Result<Category> {
        self.update_category(id, CategoryPatch::from(new)).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::CategoryNotFound(id));
        }

        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }

    async fn insert_row(&self, name: &str, new: &NewCategory) -> Result<Category> {
        let result = sqlx::query(
            "INSERT INTO categories (name, description, usage_count) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(&new.description)
        .bind(new.usage_count)
        .execute(self.pool)
        .await
        .map_err(|e| TodoError::from_write(e, || duplicate_name(name)))?;

        self.get_category(result.last_insert_rowid()).await
    }

    async fn update_row(&self, category: &Category) -> Result<()> {
        sqlx::query(
            "UPDATE categories SET name = ?, description = ?, usage_count = ? WHERE id = ?",
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.usage_count)
        .bind(category.id)
        .execute(self.pool)
        .await
        .map_err(|e| TodoError::from_write(e, || duplicate_name(&category.name)))?;

        Ok(())
    }

    async fn check_name_free(&self, name: &str, current_id: Option<i64>) -> Result<()> {
        match self.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != current_id => {
                Err(TodoError::Duplicate(duplicate_name(name)))
            },
            _ => Ok(()),
        }
    }
}

fn duplicate_name(name: &str) -> String {
    format!("category named '{}'", name)
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TodoError::InvalidInput(
            "Category name cannot be empty".into(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(TodoError::InvalidInput(format!(
            "Category name exceeds {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name)
}

fn validate_usage_count(usage_count: i64) -> Result<()> {
    if usage_count < 0 {
        return Err(TodoError::InvalidInput(
            "usage_count cannot be negative".into(),
        ));
    }
    Ok(())
}
