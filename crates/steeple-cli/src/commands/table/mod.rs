//! Table subcommand implementations.

mod create;
mod delete;
mod get;
mod update;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct TableCommand {
    #[command(subcommand)]
    pub command: TableSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TableSubcommand {
    /// Fetch records from a table
    Get(get::GetArgs),

    /// Create records in a table
    Create(create::CreateArgs),

    /// Update records in a table
    Update(update::UpdateArgs),

    /// Delete records from a table by id
    Delete(delete::DeleteArgs),
}

pub async fn handle(cmd: TableCommand) -> Result<()> {
    match cmd.command {
        TableSubcommand::Get(args) => get::run(args).await,
        TableSubcommand::Create(args) => create::run(args).await,
        TableSubcommand::Update(args) => update::run(args).await,
        TableSubcommand::Delete(args) => delete::run(args).await,
    }
}
