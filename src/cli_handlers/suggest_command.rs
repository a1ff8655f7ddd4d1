use super::utils::open_database;
use crate::config::AppConfig;
use crate::llm::build_generator;
use crate::store::SqliteStore;
use crate::suggestions::{self, SuggestionEntry, SuggestionFetcher, SuggestionMap};
use anyhow::Context;

/// Run the suggestion pipeline once and print the mapping
pub async fn handle_suggest_command(config: &AppConfig, format: &str) -> anyhow::Result<()> {
    let pool = open_database(&config.database).await?;
    let store = SqliteStore::new(pool);

    let generator = build_generator(&config.llm)?;
    let fetcher = SuggestionFetcher::new(config.llm.api_key.clone(), generator);

    let suggestions = suggestions::analyze(&store, &fetcher)
        .await
        .context("Suggestion request failed")?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else {
        print!("{}", render_text(&suggestions));
    }
    Ok(())
}

fn render_text(suggestions: &SuggestionMap) -> String {
    let mut out = String::new();
    for (title, entry) in suggestions {
        out.push_str(title);
        out.push('\n');
        let record = match entry {
            SuggestionEntry::Record(record) => record,
            SuggestionEntry::Unstructured(value) => {
                out.push_str(&format!("  raw:         {}\n", value));
                continue;
            },
        };
        if let Some(score) = record.priority_score {
            out.push_str(&format!("  priority:    {:.2}\n", score));
        }
        if let Some(deadline) = &record.suggested_deadline {
            out.push_str(&format!("  deadline:    {}\n", deadline));
        }
        if let Some(category) = &record.suggested_category {
            out.push_str(&format!("  category:    {}\n", category));
        }
        if let Some(description) = &record.enhanced_description {
            out.push_str(&format!("  description: {}\n", description));
        }
    }
    out
}
