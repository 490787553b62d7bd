//! Platform client with bearer-token lifecycle.
//!
//! [`PlatformClient`] owns the HTTP client and the token state shared by
//! all services. In managed mode it performs the OAuth2 client-credentials
//! exchange lazily before the first request and re-runs it once the safety
//! window elapses; in delegated-trust mode it uses a caller-supplied token
//! as-is and never exchanges.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::auth::{AccessToken, ClientCredentials};
use crate::config::Config;
use crate::error::{AuthError, Error};
use crate::http::HttpClient;
use crate::types::BaseUrl;

/// OAuth2 token endpoint, relative to the platform base URL.
const TOKEN_ENDPOINT: &str = "oauth/connect/token";

/// Scope requested in the client-credentials exchange.
const SCOPE_ALL: &str = "http://www.thinkministry.com/dataplatform/scopes/all";

/// Minutes a freshly exchanged token is considered valid.
///
/// Deliberately shorter than the token's real lifetime, so refresh happens
/// proactively instead of risking an in-flight expiry.
const TOKEN_SAFETY_WINDOW_MINS: i64 = 5;

/// Hours a delegated token is trusted before the caller must replace it.
const DELEGATED_VALIDITY_HOURS: i64 = 24;

/// A client for one platform instance, shared by all services.
///
/// # Thread Safety
///
/// Clients are cheap to clone (they use internal `Arc`) and are safe to
/// share across threads. Token refresh is single-flight: concurrent callers
/// that observe an expired token serialize on a write lock, the first
/// performs the exchange, and the rest re-check and reuse its result.
///
/// # Example
///
/// ```no_run
/// use steeple::{BaseUrl, ClientCredentials, PlatformClient};
///
/// # fn example() -> Result<(), steeple::Error> {
/// let base = BaseUrl::new("https://my.church.org/ministryplatformapi")?;
/// let creds = ClientCredentials::new("announcements-widget", "s3cret");
/// let client = PlatformClient::from_credentials(base, creds);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PlatformClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    auth: AuthMode,
}

enum AuthMode {
    /// Token obtained and refreshed by this client via client credentials.
    Managed {
        credentials: ClientCredentials,
        state: RwLock<TokenState>,
    },
    /// Pre-obtained token supplied by the caller (separate login flow);
    /// trusted for a fixed window, never refreshed here.
    Delegated {
        token: AccessToken,
        trusted_until: DateTime<Utc>,
    },
}

struct TokenState {
    token: Option<AccessToken>,
    expires_at: DateTime<Utc>,
}

impl TokenState {
    /// Returns the token if it has not passed its expiry.
    fn current(&self, now: DateTime<Utc>) -> Option<&AccessToken> {
        match &self.token {
            Some(token) if self.expires_at > now => Some(token),
            _ => None,
        }
    }
}

/// Response from the OAuth2 token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    expires_in: Option<u64>,
}

impl PlatformClient {
    /// Create a client that manages its own token via client credentials.
    ///
    /// No token is held initially; the first operation performs the
    /// exchange.
    pub fn from_credentials(base: BaseUrl, credentials: ClientCredentials) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: HttpClient::new(base),
                auth: AuthMode::Managed {
                    credentials,
                    state: RwLock::new(TokenState {
                        token: None,
                        // Forces an exchange on first use
                        expires_at: DateTime::<Utc>::MIN_UTC,
                    }),
                },
            }),
        }
    }

    /// Create a client from configuration.
    pub fn from_config(config: Config) -> Self {
        let Config {
            base_url,
            credentials,
        } = config;
        Self::from_credentials(base_url, credentials)
    }

    /// Create a client around a pre-obtained bearer token.
    ///
    /// The token is trusted for a fixed 24-hour window and is never
    /// refreshed by this client; the caller that obtained it owns its
    /// lifetime.
    pub fn with_delegated_token(base: BaseUrl, token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: HttpClient::new(base),
                auth: AuthMode::Delegated {
                    token: AccessToken::new(token),
                    trusted_until: Utc::now() + Duration::hours(DELEGATED_VALIDITY_HOURS),
                },
            }),
        }
    }

    /// Returns the base URL this client is configured for.
    pub fn base_url(&self) -> &BaseUrl {
        self.inner.http.base()
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    /// Ensure a usable bearer token and return it.
    ///
    /// In delegated-trust mode this is a no-op returning the supplied
    /// token. In managed mode, an expired or absent token triggers one
    /// client-credentials exchange; the stored expiry is then pinned to a
    /// short safety window rather than the token's full lifetime. A failed
    /// exchange aborts the calling operation only; there is no retry loop.
    #[instrument(skip(self))]
    pub async fn ensure_valid_token(&self) -> Result<String, Error> {
        match &self.inner.auth {
            AuthMode::Delegated {
                token,
                trusted_until,
            } => {
                if *trusted_until < Utc::now() {
                    warn!("delegated token is past its trust window; the caller owns its renewal");
                }
                Ok(token.as_str().to_string())
            }
            AuthMode::Managed { credentials, state } => {
                // Fast path: token still inside its safety window
                {
                    let state = state.read().await;
                    if let Some(token) = state.current(Utc::now()) {
                        return Ok(token.as_str().to_string());
                    }
                }

                // Slow path: serialize on the write lock; whoever gets it
                // first exchanges, later waiters see the fresh token on
                // re-check
                let mut state = state.write().await;
                if let Some(token) = state.current(Utc::now()) {
                    return Ok(token.as_str().to_string());
                }

                info!("exchanging client credentials for a new token");
                let response = self.exchange(credentials).await?;

                let token = AccessToken::new(response.access_token);
                state.token = Some(token.clone());
                state.expires_at = Utc::now() + Duration::minutes(TOKEN_SAFETY_WINDOW_MINS);

                debug!("token exchanged successfully");
                Ok(token.as_str().to_string())
            }
        }
    }

    /// Perform the OAuth2 client-credentials exchange.
    async fn exchange(&self, credentials: &ClientCredentials) -> Result<TokenResponse, Error> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id()),
            ("client_secret", credentials.client_secret()),
            ("scope", SCOPE_ALL),
        ];

        self.inner
            .http
            .post_form(TOKEN_ENDPOINT, &form)
            .await
            .map_err(|err| match err {
                Error::Http(http) => Error::Auth(AuthError::ExchangeRejected {
                    status: http.status,
                    detail: http.body,
                }),
                other => other,
            })
    }
}

// Custom Debug impl that hides token state
impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match &self.inner.auth {
            AuthMode::Managed { .. } => "managed",
            AuthMode::Delegated { .. } => "delegated",
        };
        f.debug_struct("PlatformClient")
            .field("base_url", self.base_url())
            .field("auth", &mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseUrl {
        BaseUrl::new("https://my.church.org/ministryplatformapi").unwrap()
    }

    #[test]
    fn managed_client_starts_without_a_token() {
        let client = PlatformClient::from_credentials(
            base(),
            ClientCredentials::new("id", "secret"),
        );
        let AuthMode::Managed { state, .. } = &client.inner.auth else {
            panic!("expected managed mode");
        };
        let state = state.try_read().unwrap();
        assert!(state.current(Utc::now()).is_none());
    }

    #[tokio::test]
    async fn delegated_client_returns_supplied_token() {
        let client = PlatformClient::with_delegated_token(base(), "widget-login-token");
        let token = client.ensure_valid_token().await.unwrap();
        assert_eq!(token, "widget-login-token");
    }

    #[test]
    fn token_state_expiry_check() {
        let now = Utc::now();
        let state = TokenState {
            token: Some(AccessToken::new("t")),
            expires_at: now - Duration::seconds(1),
        };
        assert!(state.current(now).is_none());

        let state = TokenState {
            token: Some(AccessToken::new("t")),
            expires_at: now + Duration::minutes(TOKEN_SAFETY_WINDOW_MINS),
        };
        assert!(state.current(now).is_some());
    }

    #[test]
    fn debug_output_redacts_token_state() {
        let client = PlatformClient::with_delegated_token(base(), "super-secret-token");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("delegated"));
    }
}
