//! Generic table CRUD.

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::client::PlatformClient;
use crate::error::Error;
use crate::query::QueryParams;
use crate::types::Table;

/// Envelope the platform expects around created/updated records.
#[derive(Debug, Serialize)]
struct RecordEnvelope<'a, T> {
    records: &'a [T],
}

/// Generic record CRUD against `/tables/{table}`.
///
/// Every operation is a fresh round trip: the service never caches or
/// mutates records locally between calls, and the platform is the source
/// of truth for record order and assigned keys. Each call ensures a valid
/// token first; an audit `$userId` in the parameters is forwarded as an
/// attribute, not an authorization check.
///
/// # Example
///
/// ```no_run
/// use steeple::{MinistryPlatform, QueryParams, Record, Table};
///
/// # async fn example() -> Result<(), steeple::Error> {
/// let platform = MinistryPlatform::from_env()?;
/// let contacts = Table::new("Contacts")?;
///
/// let params = QueryParams::new()
///     .filter("Contact_Status_ID=1")
///     .top(10);
/// let records: Vec<Record> = platform.tables().get_records(&contacts, &params).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TableService {
    client: PlatformClient,
}

impl TableService {
    /// Create a table service over the given client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }

    /// Fetch records from a table.
    ///
    /// Records come back exactly as the platform returns them; no
    /// client-side re-sorting or validation beyond deserializing into `T`.
    /// An empty result is an empty `Vec`, not an error.
    #[instrument(skip(self, params), fields(table = %table))]
    pub async fn get_records<T>(&self, table: &Table, params: &QueryParams) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned,
    {
        debug!("fetching table records");

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .get(&table_path(table), &params.to_pairs(), Some(&token))
            .await
    }

    /// Fetch at most one record, mapping absence to `None`.
    #[instrument(skip(self, params), fields(table = %table))]
    pub async fn find_one<T>(&self, table: &Table, params: &QueryParams) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
    {
        let params = params.clone().top(1);
        let records: Vec<T> = self.get_records(table, &params).await?;
        Ok(records.into_iter().next())
    }

    /// Create records in a table.
    ///
    /// Returns the created records, with platform-assigned primary keys,
    /// in response order. Order correlates by array position only.
    #[instrument(skip(self, records, params), fields(table = %table, count = records.len()))]
    pub async fn create_records<T, R>(
        &self,
        table: &Table,
        records: &[T],
        params: &QueryParams,
    ) -> Result<Vec<R>, Error>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        debug!("creating table records");

        let token = self.client.ensure_valid_token().await?;
        let envelope = RecordEnvelope { records };
        self.client
            .http()
            .post_json(&table_path(table), &params.to_pairs(), &envelope, Some(&token))
            .await
    }

    /// Update records in a table.
    ///
    /// Every record must include its primary key; with
    /// [`QueryParams::allow_create`] set, records without a key are
    /// created instead of rejected (upsert).
    #[instrument(skip(self, records, params), fields(table = %table, count = records.len()))]
    pub async fn update_records<T, R>(
        &self,
        table: &Table,
        records: &[T],
        params: &QueryParams,
    ) -> Result<Vec<R>, Error>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        debug!("updating table records");

        let token = self.client.ensure_valid_token().await?;
        let envelope = RecordEnvelope { records };
        self.client
            .http()
            .put_json(&table_path(table), &params.to_pairs(), &envelope, Some(&token))
            .await
    }

    /// Delete records from a table by id.
    ///
    /// The ids are sent as a repeated `id` query parameter; the response
    /// is the pre-deletion representation of the removed records.
    #[instrument(skip(self, params), fields(table = %table, count = ids.len()))]
    pub async fn delete_records<R>(
        &self,
        table: &Table,
        ids: &[i64],
        params: &QueryParams,
    ) -> Result<Vec<R>, Error>
    where
        R: DeserializeOwned,
    {
        debug!("deleting table records");

        let token = self.client.ensure_valid_token().await?;
        let params = params.clone().ids(ids.to_vec());
        self.client
            .http()
            .delete(&table_path(table), &params.to_pairs(), Some(&token))
            .await
    }
}

fn table_path(table: &Table) -> String {
    format!("tables/{}", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_wraps_records() {
        let records = vec![json!({"Widget_Name": "x"})];
        let envelope = RecordEnvelope { records: &records };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"records": [{"Widget_Name": "x"}]})
        );
    }

    #[test]
    fn table_path_construction() {
        let table = Table::new("Event_Participants").unwrap();
        assert_eq!(table_path(&table), "tables/Event_Participants");
    }
}
