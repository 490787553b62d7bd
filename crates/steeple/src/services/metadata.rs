//! Schema introspection.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::client::PlatformClient;
use crate::error::Error;
use crate::types::Table;

/// Metadata for one accessible table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableInfo {
    /// Table name.
    pub name: String,
    /// Access level granted to the authenticated client.
    #[serde(default)]
    pub access_level: Option<String>,
    /// Column metadata, when the platform includes it.
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

/// Metadata for one table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Platform-reported data type (SQL type name).
    pub data_type: String,
    /// Whether the column accepts nulls.
    #[serde(default)]
    pub is_nullable: bool,
    /// Whether the column is the table's primary key.
    #[serde(default)]
    pub is_primary_key: bool,
    /// Declared size, for sized types.
    #[serde(default)]
    pub size: Option<i64>,
}

/// Metadata for one accessible stored procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcedureInfo {
    /// Procedure name.
    pub name: String,
}

/// Read-only schema introspection, plus the explicit refresh trigger.
///
/// The platform treats its schema cache as slowly changing; nothing here
/// invalidates it automatically. After structural changes on the platform
/// side, call [`refresh`] to ask the platform to recompute it.
///
/// [`refresh`]: MetadataService::refresh
#[derive(Debug, Clone)]
pub struct MetadataService {
    client: PlatformClient,
}

impl MetadataService {
    /// Create a metadata service over the given client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }

    /// List the tables accessible to the authenticated client.
    #[instrument(skip(self))]
    pub async fn tables(&self) -> Result<Vec<TableInfo>, Error> {
        debug!("fetching table metadata");

        let token = self.client.ensure_valid_token().await?;
        self.client.http().get("tables", &[], Some(&token)).await
    }

    /// Look up one table's metadata by name.
    ///
    /// Absence (no such table, or no access) is `None`, not an error.
    #[instrument(skip(self), fields(table = %table))]
    pub async fn table(&self, table: &Table) -> Result<Option<TableInfo>, Error> {
        let tables = self.tables().await?;
        Ok(tables.into_iter().find(|t| t.name == table.as_str()))
    }

    /// List the stored procedures accessible to the authenticated client.
    #[instrument(skip(self))]
    pub async fn procedures(&self) -> Result<Vec<ProcedureInfo>, Error> {
        debug!("fetching procedure metadata");

        let token = self.client.ensure_valid_token().await?;
        self.client.http().get("procs", &[], Some(&token)).await
    }

    /// Ask the platform to recompute its schema cache.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), Error> {
        info!("triggering metadata refresh");

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .post_empty("refreshMetadata", &[], Some(&token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_info_parses_platform_shape() {
        let info: TableInfo = serde_json::from_value(json!({
            "Name": "Contacts",
            "AccessLevel": "ReadWrite",
            "Columns": [
                {"Name": "Contact_ID", "DataType": "int", "IsPrimaryKey": true},
                {"Name": "Display_Name", "DataType": "nvarchar", "IsNullable": true, "Size": 75}
            ]
        }))
        .unwrap();

        assert_eq!(info.name, "Contacts");
        assert_eq!(info.columns.len(), 2);
        assert!(info.columns[0].is_primary_key);
        assert_eq!(info.columns[1].size, Some(75));
    }

    #[test]
    fn columns_default_to_empty() {
        let info: TableInfo = serde_json::from_value(json!({"Name": "Events"})).unwrap();
        assert!(info.columns.is_empty());
    }
}
