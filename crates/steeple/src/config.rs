//! Environment-based configuration.

use crate::auth::ClientCredentials;
use crate::error::{ConfigError, Error};
use crate::types::BaseUrl;

/// Environment variable holding the platform API base URL.
pub const ENV_BASE_URL: &str = "MINISTRY_PLATFORM_BASE_URL";

/// Environment variable holding the OAuth2 client id.
pub const ENV_CLIENT_ID: &str = "MINISTRY_PLATFORM_CLIENT_ID";

/// Environment variable holding the OAuth2 client secret.
pub const ENV_CLIENT_SECRET: &str = "MINISTRY_PLATFORM_CLIENT_SECRET";

/// Connection settings for one platform instance.
///
/// Validated eagerly: [`Config::from_env`] reports every missing variable
/// in a single error rather than failing on the first one.
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform API base URL.
    pub base_url: BaseUrl,
    /// OAuth2 client credentials for the client-credentials grant.
    pub credentials: ClientCredentials,
}

impl Config {
    /// Create a config from explicit values.
    pub fn new(base_url: BaseUrl, credentials: ClientCredentials) -> Self {
        Self {
            base_url,
            credentials,
        }
    }

    /// Read the config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] enumerating every missing variable, or an
    /// invalid-input error when the base URL does not parse. Empty values
    /// count as missing.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the config through an injectable lookup (tests use a map).
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut missing = Vec::new();
        let mut read = |name: &str| -> Option<String> {
            match lookup(name).filter(|v| !v.is_empty()) {
                Some(value) => Some(value),
                None => {
                    missing.push(name.to_string());
                    None
                }
            }
        };

        let base_url = read(ENV_BASE_URL);
        let client_id = read(ENV_CLIENT_ID);
        let client_secret = read(ENV_CLIENT_SECRET);

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv { names: missing }.into());
        }

        // Safe: missing-variable check above covers all three
        let base_url = BaseUrl::new(base_url.unwrap())?;
        let credentials = ClientCredentials::new(client_id.unwrap(), client_secret.unwrap());

        Ok(Self {
            base_url,
            credentials,
        })
    }
}
