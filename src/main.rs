//! schoolscope: a keyboard-driven terminal browser for school report card data
//!
//! Search a statewide school database, inspect academic and demographic
//! trends for a single school, and compare up to five schools side by side.

mod app;
mod cli;
mod comparison;
mod data;
mod trend;
mod ui;

use anyhow::Result;
use cli::{AppConfig, Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Browse {
            api_url,
            limit,
            state_path,
        } => {
            let config = AppConfig::from_browse_command(api_url, limit, state_path);

            // Run the TUI application
            app::run(config)?;
        }
    }

    Ok(())
}
