//! Get records command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use steeple::{QueryParams, Record, Table};

use crate::output;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Table name (e.g., Contacts)
    pub table: String,

    /// Columns to select
    #[arg(long)]
    pub select: Option<String>,

    /// Filter predicate in the platform's query language
    #[arg(long)]
    pub filter: Option<String>,

    /// Ordering expression
    #[arg(long)]
    pub order_by: Option<String>,

    /// Maximum number of records to return
    #[arg(long)]
    pub top: Option<u32>,

    /// Number of records to skip
    #[arg(long)]
    pub skip: Option<u32>,

    /// Return only distinct rows
    #[arg(long)]
    pub distinct: bool,

    /// Global filter id to scope the query
    #[arg(long)]
    pub global_filter: Option<i64>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: GetArgs) -> Result<()> {
    let platform = crate::commands::connect()?;
    let table = Table::new(&args.table).context("Invalid table name")?;

    let mut params = QueryParams::new();
    if let Some(select) = args.select {
        params = params.select(select);
    }
    if let Some(filter) = args.filter {
        params = params.filter(filter);
    }
    if let Some(order_by) = args.order_by {
        params = params.order_by(order_by);
    }
    if let Some(top) = args.top {
        params = params.top(top);
    }
    if let Some(skip) = args.skip {
        params = params.skip(skip);
    }
    if args.distinct {
        params = params.distinct(true);
    }
    if let Some(global_filter) = args.global_filter {
        params = params.global_filter_id(global_filter);
    }

    let records: Vec<Record> = platform
        .tables()
        .get_records(&table, &params)
        .await
        .context("Failed to fetch records")?;

    if records.is_empty() {
        eprintln!("{}", "No records found.".dimmed());
        return Ok(());
    }

    for record in &records {
        if args.pretty {
            output::json_pretty(record)?;
        } else {
            output::json(record)?;
        }
    }

    Ok(())
}
