//! Typed operations layered on the platform client.
//!
//! Each service is a thin value over a shared [`PlatformClient`]; services
//! hold no other state and never cache records between calls.
//!
//! [`PlatformClient`]: crate::PlatformClient

pub mod domain;
pub mod files;
pub mod metadata;
pub mod procedures;
pub mod tables;

pub use domain::{DomainInfo, DomainService, GlobalFilter};
pub use files::{FileDescription, FileParams, FilePayload, FileService};
pub use metadata::{ColumnInfo, MetadataService, ProcedureInfo, TableInfo};
pub use procedures::{ProcParams, ProcedureService, ResultSet, Row};
pub use tables::TableService;
