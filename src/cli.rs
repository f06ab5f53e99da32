//! Command-line interface argument parsing for schoolscope.
//!
//! Usage:
//! - `schoolscope browse`
//! - `schoolscope browse --api-url "http://reportcard.example.org"`
//! - `schoolscope browse --limit 25 --state-path /tmp/comparison.json`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::JsonFileStore;

/// The backend rejects search limits outside this range.
const MAX_SEARCH_LIMIT: usize = 50;

/// A keyboard-driven terminal browser for school report card data.
///
/// Search schools, inspect trends, and compare up to five side by side.
#[derive(Parser, Debug)]
#[command(name = "schoolscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the TUI browser
    Browse {
        /// Base URL of the report card API
        #[arg(long, env = "SCHOOLSCOPE_API_URL", default_value = "http://localhost:8000")]
        api_url: String,

        /// Maximum number of search results per query (1-50)
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Path to the comparison state file
        /// Defaults to <data dir>/schoolscope/comparison.json
        #[arg(long)]
        state_path: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub search_limit: usize,
    pub state_path: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from CLI Commands
    pub fn from_browse_command(
        api_url: String,
        limit: usize,
        state_path: Option<String>,
    ) -> Self {
        let state_path = state_path
            .map(PathBuf::from)
            .unwrap_or_else(JsonFileStore::default_path);

        AppConfig {
            api_url,
            search_limit: limit.clamp(1, MAX_SEARCH_LIMIT),
            state_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config =
            AppConfig::from_browse_command("http://localhost:8000".to_string(), 10, None);
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.search_limit, 10);
        assert!(config.state_path.ends_with("comparison.json"));
    }

    #[test]
    fn test_limit_is_clamped_to_backend_range() {
        let config = AppConfig::from_browse_command("u".to_string(), 500, None);
        assert_eq!(config.search_limit, 50);

        let config = AppConfig::from_browse_command("u".to_string(), 0, None);
        assert_eq!(config.search_limit, 1);
    }

    #[test]
    fn test_explicit_state_path() {
        let config = AppConfig::from_browse_command(
            "u".to_string(),
            10,
            Some("/tmp/compare.json".to_string()),
        );
        assert_eq!(config.state_path, PathBuf::from("/tmp/compare.json"));
    }
}
