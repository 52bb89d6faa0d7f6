//! basketscan - audit the most-downloaded PyPI packages
//!
//! CLI entry point: resolves configuration and runs the fixed pipeline.
//! The process exit code mirrors the scanner's exit code on a clean run.

use basketscan::cli::Cli;
use basketscan::config::Config;
use basketscan::error::BasketscanResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> BasketscanResult<i32> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn (progress only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("basketscan=warn"),
        1 => EnvFilter::new("basketscan=info"),
        _ => EnvFilter::new("basketscan=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let config = Config::resolve(&cli)?;
    basketscan::pipeline::run(&config).await
}
