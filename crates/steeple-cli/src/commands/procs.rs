//! Stored-procedure command implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::Value;

use steeple::{ProcParams, Procedure};

use crate::commands::read_json_input;
use crate::output;

#[derive(Args, Debug)]
pub struct ProcCommand {
    #[command(subcommand)]
    pub command: ProcSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProcSubcommand {
    /// Execute a stored procedure
    Run(RunArgs),
}

pub async fn handle(cmd: ProcCommand) -> Result<()> {
    match cmd.command {
        ProcSubcommand::Run(args) => run(args).await,
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Procedure name (e.g., api_Widget_GetStats)
    pub procedure: String,

    /// Named parameter as Name=Value, repeatable; values parse as JSON,
    /// falling back to a plain string
    #[arg(long = "param", short = 'p')]
    pub params: Vec<String>,

    /// JSON file with a request body (use - for stdin); overrides --param
    #[arg(long)]
    pub body: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let platform = crate::commands::connect()?;
    let procedure = Procedure::new(&args.procedure).context("Invalid procedure name")?;

    let result_sets = if let Some(ref body) = args.body {
        let body = read_json_input(body)?;
        platform
            .procedures()
            .execute_with_body(&procedure, &body)
            .await
            .context("Failed to execute procedure")?
    } else {
        let mut params = ProcParams::new();
        for raw in &args.params {
            let (name, value) = parse_param(raw)?;
            params = params.with(name, value);
        }
        platform
            .procedures()
            .execute(&procedure, &params)
            .await
            .context("Failed to execute procedure")?
    };

    for (index, rows) in result_sets.iter().enumerate() {
        eprintln!(
            "{}",
            format!("Result set {} ({} rows)", index + 1, rows.len()).dimmed()
        );
        for row in rows {
            if args.pretty {
                output::json_pretty(row)?;
            } else {
                output::json(row)?;
            }
        }
    }

    Ok(())
}

/// Split a `Name=Value` argument, parsing the value as JSON when possible.
fn parse_param(raw: &str) -> Result<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("Parameter '{}' must be Name=Value", raw))?;

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_json_values() {
        assert_eq!(parse_param("WidgetId=5").unwrap().1, json!(5));
        assert_eq!(parse_param("Archived=false").unwrap().1, json!(false));
    }

    #[test]
    fn falls_back_to_string_values() {
        assert_eq!(
            parse_param("Campus=North Campus").unwrap().1,
            json!("North Campus")
        );
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(parse_param("WidgetId").is_err());
    }
}
