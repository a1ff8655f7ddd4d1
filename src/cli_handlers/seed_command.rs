use super::utils::open_database;
use crate::error::Result;
use crate::seed::seed_sample_data;
use std::path::Path;

pub async fn handle_seed_command(database: &Path, format: &str) -> Result<()> {
    let pool = open_database(database).await?;
    let report = seed_sample_data(&pool).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_empty() {
        println!("Sample data already present in {}", database.display());
    } else {
        println!(
            "Seeded {} categories, {} tasks, {} context entries into {}",
            report.categories,
            report.tasks,
            report.contexts,
            database.display()
        );
    }

    Ok(())
}
