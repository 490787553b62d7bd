//! OAuth2 client credentials type.

use std::fmt;

/// OAuth2 client credentials for service-to-service authentication.
///
/// This type holds the client id and secret used in the client-credentials
/// grant against the platform's token endpoint.
///
/// # Security
///
/// The secret is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use steeple::ClientCredentials;
///
/// let creds = ClientCredentials::new("announcements-widget", "s3cret");
/// assert_eq!(creds.client_id(), "announcements-widget");
/// ```
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Create new client credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns the client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret.
    ///
    /// # Security
    ///
    /// Use this only when constructing token exchange requests.
    /// Never log or display this value.
    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

// Intentionally hide the secret in Debug output
impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

// Clone is intentionally implemented to allow credentials to be reused,
// but the type is not Copy to make credential passing explicit.
impl Clone for ClientCredentials {
    fn clone(&self) -> Self {
        Self {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }
}
