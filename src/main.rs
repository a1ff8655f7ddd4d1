use clap::Parser;
use smart_todo::api::ApiServer;
use smart_todo::cli::{Cli, Commands};
use smart_todo::cli_handlers::{
    handle_config_command, handle_seed_command, handle_suggest_command,
};
use smart_todo::config::AppConfig;
use smart_todo::error::{ErrorResponse, TodoError};
use smart_todo::logging::{self, ApplicationMode, LoggingConfig};

#[tokio::main]
async fn main() {
    // Parse CLI arguments first to get logging configuration
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => apply_overrides(config, &cli.command),
        Err(e) => exit_with(&e.to_error_response()),
    };

    let file_logging = matches!(cli.command, Commands::Serve { log_file: true, .. });

    let mut log_config = LoggingConfig::from_args(cli.quiet, cli.verbose > 0, cli.json);
    if file_logging {
        log_config = LoggingConfig::for_mode(ApplicationMode::Server);
        log_config.json_format = cli.json;
        log_config.file_output = logging::log_dir();
    }
    // -v / -q on the command line beat TODO_LOG_LEVEL
    if cli.verbose == 0 && !cli.quiet {
        log_config = log_config.with_level_name(config.log_level.as_deref());
    }

    if let Err(e) = logging::init_logging(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if file_logging {
        if let Some(dir) = logging::log_dir() {
            logging::cleanup_old_logs(&dir, config.log_retention_days).ok();
        }
    }

    if let Err(e) = run(&cli, config).await {
        let error_response = match e.downcast_ref::<TodoError>() {
            Some(todo_err) => todo_err.to_error_response(),
            None => ErrorResponse {
                error: format!("{:#}", e),
                code: "INTERNAL_ERROR".to_string(),
            },
        };
        exit_with(&error_response);
    }
}

async fn run(cli: &Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.clone() {
        Commands::Serve { .. } => ApiServer::new(config).run().await?,

        Commands::Seed { format, .. } => handle_seed_command(&config.database, &format).await?,

        Commands::Suggest { format, .. } => handle_suggest_command(&config, &format).await?,

        Commands::Config(config_cmd) => handle_config_command(&config, config_cmd).await?,
    }

    Ok(())
}

/// Command-line flags take precedence over the environment
fn apply_overrides(mut config: AppConfig, command: &Commands) -> AppConfig {
    match command {
        Commands::Serve {
            host,
            port,
            database,
            ..
        } => {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
            if let Some(database) = database {
                config.database = database.clone();
            }
        },
        Commands::Seed { database, .. } | Commands::Suggest { database, .. } => {
            if let Some(database) = database {
                config.database = database.clone();
            }
        },
        Commands::Config(_) => {},
    }
    config
}

fn exit_with(error_response: &ErrorResponse) -> ! {
    match serde_json::to_string_pretty(error_response) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", error_response.error),
    }
    std::process::exit(1);
}
