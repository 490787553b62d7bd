//! Domain-wide configuration reads.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::PlatformClient;
use crate::error::Error;

/// Display settings for a platform domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainInfo {
    /// Human-readable name of the organization.
    pub display_name: String,
    /// IANA time zone the domain operates in.
    #[serde(default)]
    pub time_zone_name: Option<String>,
    /// Culture used for formatting.
    #[serde(default)]
    pub culture_name: Option<String>,
    /// API version reported by the platform.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// A global filter lookup: an id → label pair used to scope queries to an
/// organizational subdivision (e.g., a campus).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalFilter {
    /// Filter id, passed as `$globalFilterId` on table queries.
    pub key: i64,
    /// Display label.
    pub value: String,
}

/// Read-only access to domain-wide settings.
#[derive(Debug, Clone)]
pub struct DomainService {
    client: PlatformClient,
}

impl DomainService {
    /// Create a domain service over the given client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }

    /// Fetch the domain's display settings.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<DomainInfo, Error> {
        debug!("fetching domain info");

        let token = self.client.ensure_valid_token().await?;
        self.client.http().get("domain", &[], Some(&token)).await
    }

    /// Fetch the global filter lookups for the domain.
    #[instrument(skip(self))]
    pub async fn global_filters(&self) -> Result<Vec<GlobalFilter>, Error> {
        debug!("fetching global filters");

        let token = self.client.ensure_valid_token().await?;
        self.client
            .http()
            .get("domain/filters", &[], Some(&token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn domain_info_parses_platform_shape() {
        let info: DomainInfo = serde_json::from_value(json!({
            "DisplayName": "Grace Fellowship",
            "TimeZoneName": "America/Chicago",
            "ApiVersion": "1.0.0"
        }))
        .unwrap();
        assert_eq!(info.display_name, "Grace Fellowship");
        assert_eq!(info.culture_name, None);
    }

    #[test]
    fn global_filter_parses_key_value_pair() {
        let filter: GlobalFilter =
            serde_json::from_value(json!({"Key": 3, "Value": "North Campus"})).unwrap();
        assert_eq!(filter.key, 3);
        assert_eq!(filter.value, "North Campus");
    }
}
