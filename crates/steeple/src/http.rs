//! Raw HTTP client for platform requests.
//!
//! Thin verb wrapper over one `reqwest::Client`: builds the endpoint URL,
//! appends pre-rendered query pairs (repeated keys supported), injects the
//! bearer token when one is given, and parses the JSON response. No retries
//! and no client-side timeout live here; both are caller responsibilities,
//! and cancellation is dropping the returned future.

use reqwest::multipart::Form;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, trace, warn};

use crate::error::{Error, HttpError};
use crate::types::BaseUrl;

/// HTTP client for platform API requests.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    base: BaseUrl,
}

impl HttpClient {
    /// Create a new HTTP client for the given platform base URL.
    pub(crate) fn new(base: BaseUrl) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("steeple/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self { client, base }
    }

    /// Returns the base URL this client is configured for.
    pub(crate) fn base(&self) -> &BaseUrl {
        &self.base
    }

    /// Issue a GET request and parse the JSON response.
    pub(crate) async fn get<R>(
        &self,
        path: &str,
        query: &[(String, String)],
        token: Option<&str>,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.base.endpoint(path);
        debug!(%url, "GET");
        trace!(?query, "query parameters");

        let response = self
            .apply(self.client.get(&url), query, token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Issue a GET request and return the raw response bytes.
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        query: &[(String, String)],
        token: Option<&str>,
    ) -> Result<Vec<u8>, Error> {
        let url = self.base.endpoint(path);
        debug!(%url, "GET (bytes)");

        let response = self
            .apply(self.client.get(&url), query, token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            Err(Error::Http(self.read_error(response).await))
        }
    }

    /// Issue a POST request with a JSON body and parse the JSON response.
    pub(crate) async fn post_json<B, R>(
        &self,
        path: &str,
        query: &[(String, String)],
        body: &B,
        token: Option<&str>,
    ) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base.endpoint(path);
        debug!(%url, "POST");

        let response = self
            .apply(self.client.post(&url), query, token)
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Issue a bodyless POST request that returns no content.
    pub(crate) async fn post_empty(
        &self,
        path: &str,
        query: &[(String, String)],
        token: Option<&str>,
    ) -> Result<(), Error> {
        let url = self.base.endpoint(path);
        debug!(%url, "POST (no body)");

        let response = self
            .apply(self.client.post(&url), query, token)
            .send()
            .await?;

        self.expect_success(response).await
    }

    /// Issue a form-encoded POST request and parse the JSON response.
    ///
    /// Used for the OAuth2 token exchange; never carries a bearer token.
    pub(crate) async fn post_form<B, R>(&self, path: &str, form: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base.endpoint(path);
        debug!(%url, "POST (form)");

        let response = self.client.post(&url).form(form).send().await?;

        self.handle_response(response).await
    }

    /// Issue a PUT request with a JSON body and parse the JSON response.
    pub(crate) async fn put_json<B, R>(
        &self,
        path: &str,
        query: &[(String, String)],
        body: &B,
        token: Option<&str>,
    ) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base.endpoint(path);
        debug!(%url, "PUT");

        let response = self
            .apply(self.client.put(&url), query, token)
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Issue a multipart POST request and parse the JSON response.
    ///
    /// The content type is delegated to the runtime, which stamps the
    /// multipart boundary.
    pub(crate) async fn post_multipart<R>(
        &self,
        path: &str,
        query: &[(String, String)],
        form: Form,
        token: Option<&str>,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.base.endpoint(path);
        debug!(%url, "POST (multipart)");

        let response = self
            .apply(self.client.post(&url), query, token)
            .multipart(form)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Issue a multipart PUT request and parse the JSON response.
    pub(crate) async fn put_multipart<R>(
        &self,
        path: &str,
        query: &[(String, String)],
        form: Form,
        token: Option<&str>,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.base.endpoint(path);
        debug!(%url, "PUT (multipart)");

        let response = self
            .apply(self.client.put(&url), query, token)
            .multipart(form)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Issue a DELETE request and parse the JSON response.
    pub(crate) async fn delete<R>(
        &self,
        path: &str,
        query: &[(String, String)],
        token: Option<&str>,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.base.endpoint(path);
        debug!(%url, "DELETE");
        trace!(?query, "query parameters");

        let response = self
            .apply(self.client.delete(&url), query, token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Issue a DELETE request that returns no content.
    pub(crate) async fn delete_empty(
        &self,
        path: &str,
        query: &[(String, String)],
        token: Option<&str>,
    ) -> Result<(), Error> {
        let url = self.base.endpoint(path);
        debug!(%url, "DELETE (no response)");

        let response = self
            .apply(self.client.delete(&url), query, token)
            .send()
            .await?;

        self.expect_success(response).await
    }

    /// Attach query pairs and the bearer token to a request builder.
    fn apply(
        &self,
        mut builder: reqwest::RequestBuilder,
        query: &[(String, String)],
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Handle a platform response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "platform response");

        if status.is_success() {
            let body = response.json::<R>().await?;
            Ok(body)
        } else {
            Err(Error::Http(self.read_error(response).await))
        }
    }

    /// Handle a platform response where no body is expected.
    async fn expect_success(&self, response: reqwest::Response) -> Result<(), Error> {
        let status = response.status();
        trace!(status = %status, "platform response");

        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Http(self.read_error(response).await))
        }
    }

    /// Build an [`HttpError`] from a non-2xx response.
    ///
    /// The body read is best-effort enrichment: if it fails, the
    /// status-based message surfaces alone and the read failure is dropped.
    async fn read_error(&self, response: reqwest::Response) -> HttpError {
        let status = response.status();
        let reason = status.canonical_reason().map(str::to_owned);
        let body = response.text().await.ok().filter(|t| !t.is_empty());

        warn!(status = status.as_u16(), "platform returned an error response");
        HttpError::new(status.as_u16(), reason, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let base = BaseUrl::new("https://my.church.org/ministryplatformapi").unwrap();
        let client = HttpClient::new(base.clone());
        assert_eq!(client.base().as_str(), base.as_str());
    }
}
