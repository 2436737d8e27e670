//! CLI entry point for the trait-art collection pipeline

use clap::Parser;
use std::process::ExitCode;
use tracing::Level;
use traitforge::io::cli::{Cli, ProjectRunner};

// Allow print for the final error message
#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut runner = ProjectRunner::new(cli);
    match runner.run() {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
