//! Incon Tools - tracking maps and incident notifications
//!
//! A CLI tool that turns tracking spreadsheets into interactive offline maps
//! and delivers incident notification emails.

use clap::Parser;
use incon_tools::cli::Cli;
use incon_tools::commands;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
