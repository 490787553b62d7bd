//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::codegen::CodegenArgs;
use crate::commands::domain::DomainCommand;
use crate::commands::file::FileCommand;
use crate::commands::meta::MetaCommand;
use crate::commands::procs::ProcCommand;
use crate::commands::table::TableCommand;

/// MinistryPlatform CLI tool for API exploration.
#[derive(Parser, Debug)]
#[command(name = "mp")]
#[command(author, version = env!("MP_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Table record operations (get, create, update, delete)
    Table(TableCommand),

    /// Stored-procedure execution
    Proc(ProcCommand),

    /// File attachment operations
    File(FileCommand),

    /// Domain settings and global filters
    Domain(DomainCommand),

    /// Schema metadata operations
    Meta(MetaCommand),

    /// Generate a Rust struct from table metadata
    Codegen(CodegenArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
