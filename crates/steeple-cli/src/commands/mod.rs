//! Command implementations.

pub mod codegen;
pub mod domain;
pub mod file;
pub mod meta;
pub mod procs;
pub mod table;

use std::io::Read;

use anyhow::{Context, Result};
use serde_json::Value;
use steeple::MinistryPlatform;

/// Build a platform facade from the environment.
///
/// Connection settings come from the `MINISTRY_PLATFORM_*` variables (or a
/// local `.env`); the underlying error enumerates everything that is
/// missing.
pub fn connect() -> Result<MinistryPlatform> {
    MinistryPlatform::from_env().context("Failed to read MinistryPlatform connection settings")
}

/// Read a JSON value from a file path, or from stdin when the path is `-`.
pub fn read_json_input(source: &str) -> Result<Value> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).context("Failed to read JSON file")?
    };

    serde_json::from_str(&content).context("Invalid JSON input")
}
