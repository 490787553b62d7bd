//! Domain command implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::output;

#[derive(Args, Debug)]
pub struct DomainCommand {
    #[command(subcommand)]
    pub command: DomainSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DomainSubcommand {
    /// Display the domain's settings
    Show,

    /// List the domain's global filters
    Filters,
}

pub async fn handle(cmd: DomainCommand) -> Result<()> {
    match cmd.command {
        DomainSubcommand::Show => show().await,
        DomainSubcommand::Filters => filters().await,
    }
}

async fn show() -> Result<()> {
    let platform = crate::commands::connect()?;
    let info = platform
        .domain()
        .get()
        .await
        .context("Failed to fetch domain settings")?;

    output::field("Display name", &info.display_name);
    if let Some(ref time_zone) = info.time_zone_name {
        output::field("Time zone", time_zone);
    }
    if let Some(ref culture) = info.culture_name {
        output::field("Culture", culture);
    }
    if let Some(ref version) = info.api_version {
        output::field("API version", version);
    }

    Ok(())
}

async fn filters() -> Result<()> {
    let platform = crate::commands::connect()?;
    let filters = platform
        .domain()
        .global_filters()
        .await
        .context("Failed to fetch global filters")?;

    if filters.is_empty() {
        eprintln!("{}", "No global filters configured.".dimmed());
        return Ok(());
    }

    for filter in &filters {
        output::field(&filter.key.to_string(), &filter.value);
    }

    Ok(())
}
