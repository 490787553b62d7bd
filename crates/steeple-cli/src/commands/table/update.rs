//! Update records command implementation.

use anyhow::{Context, Result};
use clap::Args;

use steeple::{QueryParams, Record, Table};

use crate::commands::read_json_input;
use crate::output;

use super::create::parse_records;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Table name (e.g., Prayer_Requests)
    pub table: String,

    /// JSON file with a record object or an array of them (use - for stdin);
    /// every record must carry its primary key unless --allow-create is set
    #[arg(long)]
    pub json: String,

    /// Create records that have no primary key instead of rejecting them
    #[arg(long)]
    pub allow_create: bool,

    /// Acting user id for audit logging
    #[arg(long)]
    pub user_id: Option<i64>,

    /// Pretty-print the updated records
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: UpdateArgs) -> Result<()> {
    let platform = crate::commands::connect()?;
    let table = Table::new(&args.table).context("Invalid table name")?;

    let records = parse_records(read_json_input(&args.json)?)?;

    let mut params = QueryParams::new();
    if args.allow_create {
        params = params.allow_create(true);
    }
    if let Some(user_id) = args.user_id {
        params = params.user_id(user_id);
    }

    let updated: Vec<Record> = platform
        .tables()
        .update_records(&table, &records, &params)
        .await
        .context("Failed to update records")?;

    for record in &updated {
        if args.pretty {
            output::json_pretty(record)?;
        } else {
            output::json(record)?;
        }
    }
    output::success(&format!("Updated {} record(s) in {}", updated.len(), table));

    Ok(())
}
