//! Create records command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use steeple::{QueryParams, Record, Table};

use crate::commands::read_json_input;
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Table name (e.g., Prayer_Requests)
    pub table: String,

    /// JSON file with a record object or an array of them (use - for stdin)
    #[arg(long)]
    pub json: String,

    /// Acting user id for audit logging
    #[arg(long)]
    pub user_id: Option<i64>,

    /// Pretty-print the created records
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: CreateArgs) -> Result<()> {
    let platform = crate::commands::connect()?;
    let table = Table::new(&args.table).context("Invalid table name")?;

    let records = parse_records(read_json_input(&args.json)?)?;

    let mut params = QueryParams::new();
    if let Some(user_id) = args.user_id {
        params = params.user_id(user_id);
    }

    let created: Vec<Record> = platform
        .tables()
        .create_records(&table, &records, &params)
        .await
        .context("Failed to create records")?;

    for record in &created {
        if args.pretty {
            output::json_pretty(record)?;
        } else {
            output::json(record)?;
        }
    }
    output::success(&format!("Created {} record(s) in {}", created.len(), table));

    Ok(())
}

/// Accept a single record object or an array of them.
pub(super) fn parse_records(value: Value) -> Result<Vec<Record>> {
    let values = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    values
        .into_iter()
        .map(|v| Record::from_value(v).context("Each record must be a JSON object"))
        .collect()
}
