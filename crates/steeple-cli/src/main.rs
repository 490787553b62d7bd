//! mp - CLI tool for MinistryPlatform exploration.
//!
//! This is a thin wrapper over the `steeple` library, intended for manual
//! API exploration, debugging, and developer type generation against a
//! platform instance.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{codegen, domain, file, meta, procs, table};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up MINISTRY_PLATFORM_* variables from a local .env, if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Table(cmd) => table::handle(cmd).await,
        Commands::Proc(cmd) => procs::handle(cmd).await,
        Commands::File(cmd) => file::handle(cmd).await,
        Commands::Domain(cmd) => domain::handle(cmd).await,
        Commands::Meta(cmd) => meta::handle(cmd).await,
        Commands::Codegen(args) => codegen::run(args).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
