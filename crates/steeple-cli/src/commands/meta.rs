//! Metadata command implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::output;

#[derive(Args, Debug)]
pub struct MetaCommand {
    #[command(subcommand)]
    pub command: MetaSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MetaSubcommand {
    /// List accessible tables
    Tables(TablesArgs),

    /// List accessible stored procedures
    Procs,

    /// Ask the platform to recompute its schema cache
    Refresh,
}

pub async fn handle(cmd: MetaCommand) -> Result<()> {
    match cmd.command {
        MetaSubcommand::Tables(args) => tables(args).await,
        MetaSubcommand::Procs => procs().await,
        MetaSubcommand::Refresh => refresh().await,
    }
}

#[derive(Args, Debug)]
pub struct TablesArgs {
    /// Only list tables whose name contains this substring
    #[arg(long)]
    pub search: Option<String>,
}

async fn tables(args: TablesArgs) -> Result<()> {
    let platform = crate::commands::connect()?;
    let mut tables = platform
        .metadata()
        .tables()
        .await
        .context("Failed to fetch table metadata")?;

    if let Some(ref search) = args.search {
        let needle = search.to_lowercase();
        tables.retain(|t| t.name.to_lowercase().contains(&needle));
    }

    if tables.is_empty() {
        eprintln!("{}", "No tables found.".dimmed());
        return Ok(());
    }

    for table in &tables {
        match table.access_level {
            Some(ref level) => output::field(&table.name, level),
            None => println!("{}", table.name),
        }
    }

    Ok(())
}

async fn procs() -> Result<()> {
    let platform = crate::commands::connect()?;
    let procedures = platform
        .metadata()
        .procedures()
        .await
        .context("Failed to fetch procedure metadata")?;

    if procedures.is_empty() {
        eprintln!("{}", "No procedures found.".dimmed());
        return Ok(());
    }

    for procedure in &procedures {
        println!("{}", procedure.name);
    }

    Ok(())
}

async fn refresh() -> Result<()> {
    let platform = crate::commands::connect()?;
    platform
        .metadata()
        .refresh()
        .await
        .context("Failed to trigger metadata refresh")?;

    output::success("Metadata refresh triggered");
    Ok(())
}
