use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!(
                "unknown status '{}', expected pending, in_progress or completed",
                other
            )),
        }
    }
}

/// Where a context entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SourceType {
    Whatsapp,
    Email,
    Note,
    Other,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Whatsapp => "whatsapp",
            SourceType::Email => "email",
            SourceType::Note => "note",
            SourceType::Other => "other",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whatsapp" => Ok(SourceType::Whatsapp),
            "email" => Ok(SourceType::Email),
            "note" => Ok(SourceType::Note),
            "other" => Ok(SourceType::Other),
            other => Err(format!(
                "unknown source type '{}', expected whatsapp, email, note or other",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub usage_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deadline: Option<NaiveDate>,
    pub priority_score: Option<f64>,
    pub status: TaskStatus,
    pub category_id: Option<i64>,
}

/// Task as returned by the API, with its category embedded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ContextEntry {
    pub id: i64,
    pub content: String,
    pub source_type: SourceType,
    pub processed_insights: String,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a task
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority_score: Option<f64>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Partial task update. Nullable fields use `Some(None)` to clear.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub priority_score: Option<Option<f64>>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<i64>>,
}

impl From<NewTask> for TaskPatch {
    fn from(task: NewTask) -> Self {
        Self {
            title: Some(task.title),
            description: Some(task.description),
            completed: Some(task.completed),
            deadline: Some(task.deadline),
            priority_score: Some(task.priority_score),
            status: Some(task.status),
            category_id: Some(task.category_id),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub usage_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub usage_count: Option<i64>,
}

impl From<NewCategory> for CategoryPatch {
    fn from(category: NewCategory) -> Self {
        Self {
            name: Some(category.name),
            description: Some(category.description),
            usage_count: Some(category.usage_count),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContextEntry {
    pub content: String,
    pub source_type: SourceType,
    #[serde(default)]
    pub processed_insights: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextEntryPatch {
    pub content: Option<String>,
    pub source_type: Option<SourceType>,
    pub processed_insights: Option<String>,
}

impl From<NewContextEntry> for ContextEntryPatch {
    fn from(entry: NewContextEntry) -> Self {
        Self {
            content: Some(entry.content),
            source_type: Some(entry.source_type),
            processed_insights: Some(entry.processed_insights),
        }
    }
}

/// Distinguishes an absent field from an explicit `null`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
