//! Aggregate entry point over all services.

use crate::auth::ClientCredentials;
use crate::client::PlatformClient;
use crate::config::Config;
use crate::error::Error;
use crate::services::{
    DomainService, FileService, MetadataService, ProcedureService, TableService,
};
use crate::types::BaseUrl;

/// One call surface over a platform instance.
///
/// Aggregates all services behind a single shared [`PlatformClient`].
/// This is an explicit dependency-injected object, not a process-wide
/// singleton: tests and multi-tenant callers construct as many isolated
/// instances as they need. Cloning is cheap and shares the client (and
/// therefore the token state).
///
/// # Example
///
/// ```no_run
/// use steeple::{MinistryPlatform, QueryParams, Record, Table};
///
/// # async fn example() -> Result<(), steeple::Error> {
/// let platform = MinistryPlatform::from_env()?;
///
/// let events = Table::new("Events")?;
/// let params = QueryParams::new()
///     .filter("Event_Start_Date >= GETDATE()")
///     .order_by("Event_Start_Date")
///     .top(25);
///
/// let upcoming: Vec<Record> = platform.tables().get_records(&events, &params).await?;
/// for event in &upcoming {
///     println!("{:?}", event.get("Event_Title"));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MinistryPlatform {
    client: PlatformClient,
}

impl MinistryPlatform {
    /// Wrap an existing client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }

    /// Connect with explicit client credentials.
    pub fn from_credentials(base: BaseUrl, credentials: ClientCredentials) -> Self {
        Self::new(PlatformClient::from_credentials(base, credentials))
    }

    /// Connect using `MINISTRY_PLATFORM_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error enumerating any missing variables.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(PlatformClient::from_config(Config::from_env()?)))
    }

    /// Connect around a pre-obtained bearer token (delegated-trust mode).
    pub fn with_delegated_token(base: BaseUrl, token: impl Into<String>) -> Self {
        Self::new(PlatformClient::with_delegated_token(base, token))
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &PlatformClient {
        &self.client
    }

    /// Generic record CRUD.
    pub fn tables(&self) -> TableService {
        TableService::new(self.client.clone())
    }

    /// Stored-procedure execution.
    pub fn procedures(&self) -> ProcedureService {
        ProcedureService::new(self.client.clone())
    }

    /// File attachment operations.
    pub fn files(&self) -> FileService {
        FileService::new(self.client.clone())
    }

    /// Domain-wide configuration reads.
    pub fn domain(&self) -> DomainService {
        DomainService::new(self.client.clone())
    }

    /// Schema introspection and the refresh trigger.
    pub fn metadata(&self) -> MetadataService {
        MetadataService::new(self.client.clone())
    }
}
