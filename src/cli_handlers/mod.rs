// CLI command handlers module
//
// seed, suggest, config (serve runs api::ApiServer directly)

pub mod config_commands;
pub mod seed_command;
pub mod suggest_command;
pub mod utils;

pub use config_commands::handle_config_command;
pub use seed_command::handle_seed_command;
pub use suggest_command::handle_suggest_command;
pub use utils::open_database;
