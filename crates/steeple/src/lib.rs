//! steeple - MinistryPlatform API client
//!
//! This library provides a typed client for the MinistryPlatform REST API:
//! generic table CRUD, stored-procedure execution, file operations, and
//! schema introspection, behind one token-managing client. All
//! authenticated operations flow through a [`PlatformClient`], usually via
//! the [`MinistryPlatform`] facade.
//!
//! # Example
//!
//! ```no_run
//! use steeple::{MinistryPlatform, QueryParams, Record, Table};
//!
//! # async fn example() -> Result<(), steeple::Error> {
//! let platform = MinistryPlatform::from_env()?;
//!
//! let contacts = Table::new("Contacts")?;
//! let params = QueryParams::new()
//!     .select("Contact_ID, Display_Name")
//!     .filter("Contact_Status_ID=1")
//!     .top(10);
//!
//! let records: Vec<Record> = platform.tables().get_records(&contacts, &params).await?;
//! for record in &records {
//!     println!("{:?}: {:?}", record.key("Contact_ID"), record.get("Display_Name"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
pub mod config;
pub mod error;
mod facade;
mod http;
pub mod query;
pub mod records;
pub mod services;
pub mod types;

// Re-export primary types at crate root for convenience
pub use auth::ClientCredentials;
pub use client::PlatformClient;
pub use config::Config;
pub use error::{Error, HttpError};
pub use facade::MinistryPlatform;
pub use query::QueryParams;
pub use records::Record;
pub use services::{
    DomainInfo, DomainService, FileDescription, FileParams, FilePayload, FileService,
    GlobalFilter, MetadataService, ProcParams, ProcedureService, ResultSet, Row, TableService,
};
pub use types::{BaseUrl, Procedure, Table};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
