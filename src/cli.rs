use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
Smart To-Do - task backend with AI suggestions

Stores tasks, categories and context entries (emails, notes, messages) in
SQLite and serves them over a JSON API. POST /api/ai-suggestions/ asks the
configured language model for a priority score, deadline, description and
category for every task.

Getting started:
  todo seed      Insert sample categories, tasks and context entries
  todo serve     Run the HTTP API on TODO_HOST:TODO_PORT
  todo suggest   Run the suggestion pipeline once and print the result

Configuration comes from the environment (TODO_DATABASE, TODO_PORT,
TODO_LLM_PROVIDER, GEMINI_API_KEY, ...). See `todo config show`.
"#;

#[derive(Parser, Clone)]
#[command(name = "todo")]
#[command(about = "Smart To-Do - task CRUD API with LLM-powered suggestions")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output (-q)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output logs in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Bind host (overrides TODO_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides TODO_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// SQLite database file (overrides TODO_DATABASE)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Write logs to ~/.smart-todo/logs instead of stdout
        #[arg(long)]
        log_file: bool,
    },

    /// Insert sample data (skipped for categories that already exist)
    Seed {
        /// SQLite database file (overrides TODO_DATABASE)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run the suggestion pipeline once against the database
    Suggest {
        /// SQLite database file (overrides TODO_DATABASE)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Print the resolved configuration with secrets masked
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
