use crate::db::models::{ContextEntry, Task};

/// Anything that can be rendered as a `Source: <type>, Content: <content>` line
pub trait ContextSource {
    fn source_label(&self) -> &str;
    fn content(&self) -> &str;
}

/// Anything that contributes a `- <title>` line
pub trait TaskTitle {
    fn title(&self) -> &str;
}

impl ContextSource for ContextEntry {
    fn source_label(&self) -> &str {
        self.source_type.as_str()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

impl TaskTitle for Task {
    fn title(&self) -> &str {
        &self.title
    }
}

impl<S: AsRef<str>, C: AsRef<str>> ContextSource for (S, C) {
    fn source_label(&self) -> &str {
        self.0.as_ref()
    }

    fn content(&self) -> &str {
        self.1.as_ref()
    }
}

impl TaskTitle for String {
    fn title(&self) -> &str {
        self
    }
}

impl TaskTitle for &str {
    fn title(&self) -> &str {
        self
    }
}

pub fn render_contexts<C: ContextSource>(contexts: &[C]) -> String {
    contexts
        .iter()
        .map(|c| format!("Source: {}, Content: {}", c.source_label(), c.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_tasks<T: TaskTitle>(tasks: &[T]) -> String {
    tasks
        .iter()
        .map(|t| format!("- {}", t.title()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the suggestion prompt. Context and task lines keep their input order;
/// duplicate titles are passed through untouched.
pub fn build_prompt<C: ContextSource, T: TaskTitle>(contexts: &[C], tasks: &[T]) -> String {
    format!(
        r#"As a smart task assistant, analyze the following daily context and current tasks.
Based on this information, provide intelligent suggestions for the tasks.

**Daily Context:**
{}

**Current Tasks:**
{}

**Your goal is to return a single, valid JSON object** with suggestions for each task title.
For each task, provide the following:
1.  `priority_score`: A score from 0.0 to 1.0 (higher means more urgent).
2.  `suggested_deadline`: A realistic deadline in YYYY-MM-DD format.
3.  `enhanced_description`: A more detailed, context-aware description for the task.
4.  `suggested_category`: A relevant category name for the task.

**Example Response Format (JSON):**
{{
  "task title 1": {{
    "priority_score": 0.8,
    "suggested_deadline": "2025-08-12",
    "enhanced_description": "Enhanced details based on context.",
    "suggested_category": "Work"
  }},
  "task title 2": {{
    "priority_score": 0.5,
    "suggested_deadline": "2025-08-14",
    "enhanced_description": "More details here.",
    "suggested_category": "Personal"
  }}
}}

Please provide the JSON response now."#,
        render_contexts(contexts),
        render_tasks(tasks)
    )
}
