//! File command implementations.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use uuid::Uuid;

use steeple::Table;

use crate::output;

#[derive(Args, Debug)]
pub struct FileCommand {
    #[command(subcommand)]
    pub command: FileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FileSubcommand {
    /// List file metadata attached to a record
    List(ListArgs),

    /// Fetch public file content by unique id (no authentication)
    Fetch(FetchArgs),
}

pub async fn handle(cmd: FileCommand) -> Result<()> {
    match cmd.command {
        FileSubcommand::List(args) => list(args).await,
        FileSubcommand::Fetch(args) => fetch(args).await,
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Table the record belongs to (e.g., Events)
    pub table: String,

    /// Record id
    pub record_id: i64,

    /// Only list the record's default image
    #[arg(long)]
    pub default_only: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

async fn list(args: ListArgs) -> Result<()> {
    let platform = crate::commands::connect()?;
    let table = Table::new(&args.table).context("Invalid table name")?;

    let default_only = args.default_only.then_some(true);
    let files = platform
        .files()
        .files_for_record(&table, args.record_id, default_only)
        .await
        .context("Failed to list files")?;

    if files.is_empty() {
        eprintln!("{}", "No files found.".dimmed());
        return Ok(());
    }

    for file in &files {
        if args.pretty {
            output::json_pretty(file)?;
        } else {
            output::json(file)?;
        }
    }

    Ok(())
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Globally unique file id
    pub unique_id: String,

    /// Fetch the thumbnail rendition
    #[arg(long)]
    pub thumbnail: bool,

    /// Write the bytes to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

async fn fetch(args: FetchArgs) -> Result<()> {
    let platform = crate::commands::connect()?;
    let unique_id = Uuid::parse_str(&args.unique_id).context("Invalid unique file id")?;

    let bytes = platform
        .files()
        .content_by_unique_id(&unique_id, args.thumbnail)
        .await
        .context("Failed to fetch file content")?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, &bytes).context("Failed to write output file")?;
            output::success(&format!("Wrote {} bytes to {}", bytes.len(), path.display()));
        }
        None => {
            std::io::stdout()
                .write_all(&bytes)
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
