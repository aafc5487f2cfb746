//! Shared HTTP client for the document backend.
//!
//! Provides a minimal client that attaches `Authorization: Bearer {token}`
//! when the credential store has a token, generic GET/POST/PATCH/DELETE
//! helpers, and document methods (status, view-url, preview, export, ...).
//! The preview crate and the CLI use this client directly.

pub mod api;
pub mod credentials;

use bytes::Bytes;
use docview_core::{ClientConfig, DocviewError, DocviewResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub use credentials::{
    ChainedCredentials, CredentialStore, EnvCredentials, FileCredentials, StaticCredentials,
};

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Response body with the server-reported content type.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// HTTP client for the document backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialStore>) -> DocviewResult<Self> {
        Self::with_timeout(
            base_url,
            credentials,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        base_url: &str,
        credentials: Arc<dyn CredentialStore>,
        timeout: Duration,
    ) -> DocviewResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocviewError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Client for `config.api_url`. Tokens come from the credential file when
    /// configured, then from `DOCVIEW_ACCESS_TOKEN`.
    pub fn from_config(config: &ClientConfig) -> DocviewResult<Self> {
        let mut chain = ChainedCredentials::new();
        if let Some(path) = &config.credentials_path {
            chain = chain.with(FileCredentials::new(path));
        }
        chain = chain.with(EnvCredentials);

        Self::with_timeout(
            &config.api_url,
            Arc::new(chain),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn has_token(&self) -> bool {
        self.credentials.access_token().is_some()
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send and turn transport failures and non-2xx statuses into errors.
    async fn send(&self, request: RequestBuilder) -> DocviewResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| DocviewError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!(status = status.as_u16(), "Backend request failed");
            return Err(DocviewError::from_status(status.as_u16(), error_text));
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> DocviewResult<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| DocviewError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| {
            DocviewError::InvalidResponse(format!("Failed to parse response as JSON: {}", e))
        })
    }

    async fn read_body(response: Response) -> DocviewResult<FetchedBody> {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DocviewError::Network(e.to_string()))?;
        Ok(FetchedBody {
            bytes,
            content_type,
        })
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> DocviewResult<T> {
        let mut request = self.apply_auth(self.client.get(self.build_url(path)));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// GET request returning the raw body.
    pub async fn get_bytes(&self, path: &str) -> DocviewResult<FetchedBody> {
        let request = self.apply_auth(self.client.get(self.build_url(path)));
        let response = self.send(request).await?;
        Self::read_body(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> DocviewResult<T> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// POST JSON body and return the raw response body.
    pub async fn post_for_bytes<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> DocviewResult<FetchedBody> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        let response = self.send(request).await?;
        Self::read_body(response).await
    }

    /// PATCH JSON body and deserialize response.
    pub async fn patch_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> DocviewResult<T> {
        let request = self.apply_auth(self.client.patch(self.build_url(path)).json(body));
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> DocviewResult<()> {
        let request = self.apply_auth(self.client.delete(self.build_url(path)));
        self.send(request).await?;
        Ok(())
    }

    /// GET an absolute URL (signed storage URL or stream endpoint).
    ///
    /// With `authenticated` the bearer token is attached; signed storage URLs
    /// must be fetched without it.
    pub async fn fetch_url(&self, url: &str, authenticated: bool) -> DocviewResult<FetchedBody> {
        let mut request = self.client.get(url);
        if authenticated {
            request = self.apply_auth(request);
        }
        let response = self.send(request).await?;
        Self::read_body(response).await
    }

    /// GET an absolute URL and decode the body as UTF-8 (lossy).
    pub async fn fetch_url_text(&self, url: &str, authenticated: bool) -> DocviewResult<String> {
        let body = self.fetch_url(url, authenticated).await?;
        Ok(String::from_utf8_lossy(&body.bytes).into_owned())
    }

    /// Raw client for custom requests. Caller must apply auth.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

// Re-export domain response types for convenience.
pub use docview_core::models::{
    AckResponse, Document, DocumentPatch, DownloadUrlResponse, ExportFormat, PreviewResponse,
    SlidesResponse, ViewUrlResponse,
};
