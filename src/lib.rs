pub mod api;
pub mod categories;
pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod contexts;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod seed;
pub mod store;
pub mod suggestions;
pub mod tasks;

#[cfg(test)]
pub mod test_utils;
