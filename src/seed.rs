//! Sample data for a fresh database.

use crate::categories::CategoryManager;
use crate::contexts::ContextManager;
use crate::db::models::{NewCategory, NewContextEntry, NewTask, SourceType};
use crate::error::Result;
use crate::tasks::TaskManager;
use serde::Serialize;
use sqlx::SqlitePool;

const CATEGORIES: &[(&str, &str)] = &[
    ("Work", "Work related tasks"),
    ("Personal", "Personal tasks"),
];

/// (title, description, category name)
const TASKS: &[(&str, &str, &str)] = &[
    (
        "Finish assignment",
        "Complete the Smart Todo List assignment",
        "Work",
    ),
    ("Buy groceries", "Milk, Bread, Eggs", "Personal"),
];

const CONTEXTS: &[(&str, SourceType)] = &[
    ("Project deadline is Friday", SourceType::Email),
    ("Remember to call mom", SourceType::Note),
];

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub tasks: usize,
    pub contexts: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.categories == 0 && self.tasks == 0 && self.contexts == 0
    }
}

/// Insert the sample records. A category that already exists by name is
/// reused, and its tasks and the sample context entries are only inserted
/// alongside a newly created category set.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<SeedReport> {
    let category_mgr = CategoryManager::new(pool);
    let task_mgr = TaskManager::new(pool);
    let context_mgr = ContextManager::new(pool);

    let mut report = SeedReport::default();

    for (name, description) in CATEGORIES {
        let category = match category_mgr.find_by_name(name).await? {
            Some(_) => {
                tracing::debug!(category = name, "Sample category already present");
                continue;
            },
            None => {
                category_mgr
                    .add_category(NewCategory {
                        name: name.to_string(),
                        description: description.to_string(),
                        usage_count: 0,
                    })
                    .await?
            },
        };
        report.categories += 1;

        for (title, task_description, _) in TASKS.iter().filter(|(_, _, c)| c == name) {
            task_mgr
                .add_task(NewTask {
                    title: title.to_string(),
                    description: task_description.to_string(),
                    category_id: Some(category.id),
                    ..Default::default()
                })
                .await?;
            report.tasks += 1;
        }
    }

    // Context entries have no natural key; only seed them into a fresh database
    if report.categories == CATEGORIES.len() {
        for (content, source_type) in CONTEXTS {
            context_mgr
                .add_entry(NewContextEntry {
                    content: content.to_string(),
                    source_type: *source_type,
                    processed_insights: String::new(),
                })
                .await?;
            report.contexts += 1;
        }
    }

    tracing::info!(
        categories = report.categories,
        tasks = report.tasks,
        contexts = report.contexts,
        "Sample data seeded"
    );
    Ok(report)
}
