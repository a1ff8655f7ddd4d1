use crate::cli::ConfigCommands;
use crate::config::{mask_value, AppConfig};
use crate::error::Result;

/// Handle all `todo config` subcommands
pub async fn handle_config_command(config: &AppConfig, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { format } => handle_show(config, &format),
    }
}

fn handle_show(config: &AppConfig, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        for (key, value) in display_entries(config) {
            println!("{:<24} {}", key, value);
        }
    }
    Ok(())
}

/// `(variable, shown value)` pairs for text output
fn display_entries(config: &AppConfig) -> Vec<(&'static str, String)> {
    vec![
        ("TODO_DATABASE", config.database.display().to_string()),
        ("TODO_HOST", config.host.clone()),
        ("TODO_PORT", config.port.to_string()),
        (
            "TODO_LOG_LEVEL",
            config.log_level.clone().unwrap_or_else(|| "info".to_string()),
        ),
        (
            "TODO_LOG_RETENTION_DAYS",
            config.log_retention_days.to_string(),
        ),
        ("TODO_LLM_PROVIDER", config.llm.provider.to_string()),
        ("TODO_LLM_MODEL", config.llm.model.clone()),
        ("TODO_LLM_ENDPOINT", config.llm.endpoint.clone()),
        ("TODO_LLM_TIMEOUT_SECS", config.llm.timeout_secs.to_string()),
        (
            "api key",
            config
                .llm
                .api_key
                .as_deref()
                .map(mask_value)
                .unwrap_or_else(|| "(not set)".to_string()),
        ),
    ]
}
