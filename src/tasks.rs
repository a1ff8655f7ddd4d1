use crate::categories::CategoryManager;
use crate::db::models::{NewTask, Task, TaskDetail, TaskPatch};
use crate::error::{Result, TodoError};
use chrono::Utc;
use sqlx::SqlitePool;

const TASK_COLUMNS: &str = "id, title, description, completed, created_at, updated_at, \
     deadline, priority_score, status, category_id";

const MAX_TITLE_LEN: usize = 255;

pub struct TaskManager<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskManager<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All tasks, newest first
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks ORDER BY id DESC",
            TASK_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(tasks)
    }

    /// All tasks with their categories embedded, newest first
    pub async fn list_task_details(&self) -> Result<Vec<TaskDetail>> {
        let tasks = self.list_tasks().await?;
        let categories = CategoryManager::new(self.pool).list_categories().await?;

        Ok(tasks
            .into_iter()
            .map(|task| {
                let category = task
                    .category_id
                    .and_then(|cid| categories.iter().find(|c| c.id == cid).cloned());
                TaskDetail { task, category }
            })
            .collect())
    }

    pub async fn get_task(&self, id: i64) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = ?",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(TodoError::TaskNotFound(id))?;

        Ok(task)
    }

    pub async fn get_task_detail(&self, id: i64) -> Result<TaskDetail> {
        let task = self.get_task(id).await?;
        self.with_category(task).await
    }

    pub async fn add_task(&self, new: NewTask) -> Result<Task> {
        let title = validate_title(&new.title)?;
        validate_priority(new.priority_score)?;
        if let Some(cid) = new.category_id {
            self.check_category_exists(cid).await?;
        }

        let task = self.insert_row(title, &new).await?;
        tracing::info!(task_id = task.id, title = %task.title, "Task created");
        Ok(task)
    }

    /// Apply a partial update. `updated_at` is always refreshed.
    pub async fn update_task(&self, id: i64, patch: TaskPatch) -> Result<Task> {
        let mut task = self.get_task(id).await?;

        if let Some(title) = patch.title {
            task.title = validate_title(&title)?.to_string();
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(deadline) = patch.deadline {
            task.deadline = deadline;
        }
        if let Some(priority_score) = patch.priority_score {
            validate_priority(priority_score)?;
            task.priority_score = priority_score;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(category_id) = patch.category_id {
            if let Some(cid) = category_id {
                self.check_category_exists(cid).await?;
            }
            task.category_id = category_id;
        }

        self.update_row(&task).await?;
        tracing::debug!(task_id = id, "Task updated");
        self.get_task(id).await
    }

    /// Replace every writable field of a task
    pub async fn replace_task(&self, id: i64, new: NewTask) -> Result<Task> {
        self.update_task(id, TaskPatch::from(new)).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::TaskNotFound(id));
        }

        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }

    pub async fn count_tasks(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    pub async fn with_category(&self, task: Task) -> Result<TaskDetail> {
        let category = match task.category_id {
            Some(cid) => CategoryManager::new(self.pool)
                .find_category(cid)
                .await?,
            None => None,
        };
        Ok(TaskDetail { task, category })
    }

    async fn insert_row(&self, title: &str, new: &NewTask) -> Result<Task> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (title, description, completed, created_at, updated_at,
                               deadline, priority_score, status, category_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(&new.description)
        .bind(new.completed)
        .bind(now)
        .bind(now)
        .bind(new.deadline)
        .bind(new.priority_score)
        .bind(new.status)
        .bind(new.category_id)
        .execute(self.pool)
        .await
        .map_err(|e| TodoError::from_write(e, || missing_category(new.category_id)))?;

        self.get_task(result.last_insert_rowid()).await
    }

    /// Write every column of `task` back; `updated_at` is set to now
    async fn update_row(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, completed = ?, updated_at = ?,
                deadline = ?, priority_score = ?, status = ?, category_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(Utc::now())
        .bind(task.deadline)
        .bind(task.priority_score)
        .bind(task.status)
        .bind(task.category_id)
        .bind(task.id)
        .execute(self.pool)
        .await
        .map_err(|e| TodoError::from_write(e, || missing_category(task.category_id)))?;

        Ok(())
    }

    async fn check_category_exists(&self, category_id: i64) -> Result<()> {
        if CategoryManager::new(self.pool)
            .find_category(category_id)
            .await?
            .is_none()
        {
            return Err(TodoError::InvalidInput(missing_category(Some(category_id))));
        }
        Ok(())
    }
}

fn missing_category(category_id: Option<i64>) -> String {
    match category_id {
        Some(id) => format!("Category {} does not exist", id),
        None => "Category does not exist".to_string(),
    }
}

fn validate_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TodoError::InvalidInput("Task title cannot be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TodoError::InvalidInput(format!(
            "Task title exceeds {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title)
}

fn validate_priority(priority_score: Option<f64>) -> Result<()> {
    match priority_score {
        Some(p) if !(0.0..=1.0).contains(&p) => Err(TodoError::InvalidInput(format!(
            "priority_score must be between 0.0 and 1.0, got {}",
            p
        ))),
        _ => Ok(()),
    }
}
