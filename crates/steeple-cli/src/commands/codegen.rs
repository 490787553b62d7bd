//! Type-generation command implementation.
//!
//! Reads a table's column metadata and emits a serde-ready Rust struct,
//! so application code can use typed records instead of the open map.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use steeple::Table;
use steeple::services::{ColumnInfo, TableInfo};

use crate::output;

#[derive(Args, Debug)]
pub struct CodegenArgs {
    /// Table to generate a struct for
    pub table: String,

    /// Write the generated source to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub async fn run(args: CodegenArgs) -> Result<()> {
    let platform = crate::commands::connect()?;
    let table = Table::new(&args.table).context("Invalid table name")?;

    let info = platform
        .metadata()
        .table(&table)
        .await
        .context("Failed to fetch table metadata")?
        .with_context(|| format!("Table '{}' is not accessible", table))?;

    if info.columns.is_empty() {
        anyhow::bail!("Platform returned no column metadata for '{}'", table);
    }

    let source = render_struct(&info);

    match args.out {
        Some(path) => {
            std::fs::write(&path, &source).context("Failed to write output file")?;
            output::success(&format!("Wrote {} to {}", struct_name(&info.name), path.display()));
        }
        None => print!("{}", source),
    }

    Ok(())
}

/// Render a table's columns as a Rust struct definition.
fn render_struct(info: &TableInfo) -> String {
    let mut source = String::new();
    let name = struct_name(&info.name);

    let _ = writeln!(source, "// Generated by `mp codegen {}`. Do not edit by hand.", info.name);
    let _ = writeln!(source);
    let _ = writeln!(source, "use serde::{{Deserialize, Serialize}};");
    if info.columns.iter().any(|c| rust_type(&c.data_type) == "DateTime<Utc>") {
        let _ = writeln!(source, "use chrono::{{DateTime, Utc}};");
    }
    if info.columns.iter().any(|c| rust_type(&c.data_type) == "Uuid") {
        let _ = writeln!(source, "use uuid::Uuid;");
    }
    let _ = writeln!(source);
    let _ = writeln!(source, "#[derive(Debug, Clone, Serialize, Deserialize)]");
    let _ = writeln!(source, "pub struct {} {{", name);

    for column in &info.columns {
        let _ = writeln!(source, "    #[serde(rename = \"{}\")]", column.name);
        if column.is_nullable {
            let _ = writeln!(source, "    #[serde(default)]");
        }
        let _ = writeln!(
            source,
            "    pub {}: {},",
            field_name(&column.name),
            field_type(column)
        );
    }

    let _ = writeln!(source, "}}");
    source
}

fn field_type(column: &ColumnInfo) -> String {
    let base = rust_type(&column.data_type);
    if column.is_nullable {
        format!("Option<{}>", base)
    } else {
        base.to_string()
    }
}

/// Map a platform-reported SQL type to a Rust type.
fn rust_type(data_type: &str) -> &'static str {
    match data_type.to_lowercase().as_str() {
        "int" | "integer" | "bigint" | "smallint" | "tinyint" => "i64",
        "bit" | "boolean" => "bool",
        "real" | "float" | "decimal" | "numeric" | "money" => "f64",
        "date" | "time" | "datetime" | "datetime2" | "smalldatetime" | "timestamp" => {
            "DateTime<Utc>"
        }
        "uniqueidentifier" | "guid" => "Uuid",
        _ => "String",
    }
}

/// Turn a table name into a struct name (`Event_Participants` → `EventParticipants`).
fn struct_name(table: &str) -> String {
    table
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Turn a column name into a field name (`Contact_ID` → `contact_id`).
fn field_name(column: &str) -> String {
    let name = column.to_lowercase();
    if is_rust_keyword(&name) {
        format!("{}_", name)
    } else {
        name
    }
}

fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "type" | "use" | "ref" | "move" | "loop" | "match" | "mod" | "fn" | "impl" | "where"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, data_type: &str, nullable: bool, pk: bool) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: nullable,
            is_primary_key: pk,
            size: None,
        }
    }

    fn contacts() -> TableInfo {
        TableInfo {
            name: "Event_Participants".to_string(),
            access_level: Some("ReadWrite".to_string()),
            columns: vec![
                column("Event_Participant_ID", "int", false, true),
                column("Notes", "nvarchar", true, false),
                column("_Setup_Date", "datetime", true, false),
                column("Guid", "uniqueidentifier", false, false),
            ],
        }
    }

    #[test]
    fn struct_name_camel_cases_underscores() {
        assert_eq!(struct_name("Event_Participants"), "EventParticipants");
        assert_eq!(struct_name("Contacts"), "Contacts");
    }

    #[test]
    fn field_name_lowercases_and_avoids_keywords() {
        assert_eq!(field_name("Contact_ID"), "contact_id");
        assert_eq!(field_name("Type"), "type_");
    }

    #[test]
    fn maps_sql_types() {
        assert_eq!(rust_type("INT"), "i64");
        assert_eq!(rust_type("bit"), "bool");
        assert_eq!(rust_type("money"), "f64");
        assert_eq!(rust_type("datetime"), "DateTime<Utc>");
        assert_eq!(rust_type("uniqueidentifier"), "Uuid");
        assert_eq!(rust_type("nvarchar"), "String");
    }

    #[test]
    fn renders_complete_struct() {
        let source = render_struct(&contacts());

        assert!(source.contains("pub struct EventParticipants {"));
        assert!(source.contains("use chrono::{DateTime, Utc};"));
        assert!(source.contains("use uuid::Uuid;"));
        assert!(source.contains("#[serde(rename = \"Event_Participant_ID\")]"));
        assert!(source.contains("pub event_participant_id: i64,"));
        assert!(source.contains("pub notes: Option<String>,"));
        assert!(source.contains("pub _setup_date: Option<DateTime<Utc>>,"));
        assert!(source.contains("pub guid: Uuid,"));
    }

    #[test]
    fn skips_time_imports_when_unused() {
        let info = TableInfo {
            name: "Topics".to_string(),
            access_level: None,
            columns: vec![column("Topic_ID", "int", false, true)],
        };
        let source = render_struct(&info);
        assert!(!source.contains("chrono"));
        assert!(!source.contains("uuid"));
    }
}
