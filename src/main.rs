//! Main entry point for tabcompare CLI

use clap::Parser;
use env_logger::Env;
use tabcompare::cli::Cli;
use tabcompare::commands::execute_command;

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    env_logger::init_from_env(Env::default().default_filter_or(cli.log_level()));

    // Execute the command
    if let Err(e) = execute_command(cli.command, cli.config.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
