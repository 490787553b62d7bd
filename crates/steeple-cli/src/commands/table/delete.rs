//! Delete records command implementation.

use anyhow::{Context, Result};
use clap::Args;

use steeple::{QueryParams, Record, Table};

use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Table name (e.g., Prayer_Requests)
    pub table: String,

    /// Record ids to delete
    #[arg(required = true)]
    pub ids: Vec<i64>,

    /// Acting user id for audit logging
    #[arg(long)]
    pub user_id: Option<i64>,

    /// Print the pre-deletion records as JSON
    #[arg(long)]
    pub show_removed: bool,
}

pub async fn run(args: DeleteArgs) -> Result<()> {
    let platform = crate::commands::connect()?;
    let table = Table::new(&args.table).context("Invalid table name")?;

    let mut params = QueryParams::new();
    if let Some(user_id) = args.user_id {
        params = params.user_id(user_id);
    }

    let removed: Vec<Record> = platform
        .tables()
        .delete_records(&table, &args.ids, &params)
        .await
        .context("Failed to delete records")?;

    if args.show_removed {
        for record in &removed {
            output::json(record)?;
        }
    }
    output::success(&format!("Deleted {} record(s) from {}", removed.len(), table));

    Ok(())
}
