//! HTTP client for the VPSie REST API.
//!
//! Every entity type gets its own narrow async trait (`StorageApi`,
//! `DomainApi`, ...) so that each adapter depends only on the calls it
//! makes. [`Client`] implements all of them against the live API; the
//! [`VpsieApi`] trait is their union and is what the provider injects into
//! its adapters after configure.
//!
//! Responses are wrapped in an envelope:
//!
//! ```text
//! {"error": false, "message": "...", "data": <payload>}
//! ```
//!
//! A non-2xx status or `"error": true` becomes [`ClientError::Api`].

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

mod access_token;
mod domain;
mod project;
mod reverse_dns;
mod script;
mod server;
mod ssh_key;
mod storage;

#[cfg(test)]
pub(crate) mod mock;

pub use access_token::{AccessToken, AccessTokenApi, CreateAccessTokenRequest, UpdateAccessTokenRequest};
pub use domain::{CreateDomainRequest, DnsRecord, Domain, DomainApi};
pub use project::{CreateProjectRequest, Project, ProjectApi};
pub use reverse_dns::{ReverseDnsApi, ReversePtr};
pub use script::{Script, ScriptApi, ScriptRequest};
pub use server::{CreateServerRequest, Server, ServerApi};
pub use ssh_key::{CreateSshKeyRequest, SshKey, SshKeyApi};
pub use storage::{
    CreateSnapshotRequest, CreateStorageRequest, SnapshotApi, Storage, StorageApi,
    StorageSnapshot,
};

/// Default API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://api.vpsie.com/apps/v2";

/// Header carrying the access token on every request.
pub const AUTH_HEADER: &str = "Vpsie-Auth";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors returned by the API client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a failure status or an error envelope.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the API.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A lookup found no matching entity.
    #[error("{0}")]
    NotFound(String),
}

impl ClientError {
    /// Whether the error means the entity does not exist remotely.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { status, .. } => *status == StatusCode::NOT_FOUND.as_u16(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Union of every per-entity API trait.
pub trait VpsieApi:
    AccessTokenApi
    + DomainApi
    + ReverseDnsApi
    + ProjectApi
    + ScriptApi
    + SshKeyApi
    + StorageApi
    + SnapshotApi
    + ServerApi
    + Send
    + Sync
    + 'static
{
}

impl<T> VpsieApi for T where
    T: AccessTokenApi
        + DomainApi
        + ReverseDnsApi
        + ProjectApi
        + ScriptApi
        + SshKeyApi
        + StorageApi
        + SnapshotApi
        + ServerApi
        + Send
        + Sync
        + 'static
{
}

/// Connection settings for [`Client`].
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub endpoint: String,
    /// Access token sent in the [`AUTH_HEADER`] header.
    pub access_token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for the public API endpoint.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: access_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the API base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"(sensitive value)")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// VPSie API client.
///
/// Built once during provider configure and shared read-only afterwards.
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Build a client from the given settings.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("terraform-provider-vpsie/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token,
        })
    }

    /// The API base URL this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.endpoint, path)
    }

    async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(method = %method, url = %url, "Sending API request");

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(AUTH_HEADER, &self.access_token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(method = %method, url = %url, status = status.as_u16(), "API request completed");

        let result = decode_envelope(status, &bytes);
        if let Err(ref e) = result {
            warn!(method = %method, url = %url, error = %e, "API request failed");
        }
        result
    }

    /// GET a payload that must be present.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request::<(), T>(Method::GET, path, None)
            .await?
            .ok_or_else(|| ClientError::Decode(format!("response to GET {} has no data", path)))
    }

    /// GET a list; a missing `data` field is an empty list.
    pub(crate) async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        Ok(self
            .request::<(), Vec<T>>(Method::GET, path, None)
            .await?
            .unwrap_or_default())
    }

    /// Send a request whose response payload is ignored.
    pub(crate) async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ClientError> {
        self.request::<B, IgnoredAny>(method, path, body).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Turn a raw response into the envelope payload or a [`ClientError`].
fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<Option<T>, ClientError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<Envelope<IgnoredAny>>(body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let envelope: Envelope<T> =
        serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    if envelope.error {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| "request failed".to_string()),
        });
    }
    Ok(envelope.data)
}

/// Escape one path segment (identifiers, IPs, record names).
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://api.vpsie.com/apps/v2/", "/storages"),
            "https://api.vpsie.com/apps/v2/storages"
        );
        assert_eq!(join_url("http://localhost:8080", "vms/abc"), "http://localhost:8080/vms/abc");
    }

    #[test]
    fn test_decode_envelope_data() {
        let body = br#"{"error": false, "data": [{"name": "a"}, {"name": "b"}]}"#;
        let items: Vec<Item> = decode_envelope(StatusCode::OK, body).unwrap().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "b");
    }

    #[test]
    fn test_decode_envelope_empty_body() {
        let result: Option<Item> = decode_envelope(StatusCode::NO_CONTENT, b"").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_envelope_error_flag() {
        let body = br#"{"error": true, "message": "name already taken"}"#;
        let err = decode_envelope::<Item>(StatusCode::OK, body).unwrap_err();
        assert_eq!(
            err,
            ClientError::Api {
                status: 200,
                message: "name already taken".to_string()
            }
        );
    }

    #[test]
    fn test_decode_envelope_failure_status() {
        let body = br#"{"error": true, "message": "storage not found"}"#;
        let err = decode_envelope::<Item>(StatusCode::NOT_FOUND, body).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error (404): storage not found");

        let err = decode_envelope::<Item>(StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
        assert_eq!(err.to_string(), "API error (502): Bad Gateway");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_decode_envelope_malformed() {
        let err = decode_envelope::<Item>(StatusCode::OK, b"{not json").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_segment_escaping() {
        assert_eq!(segment("vm-123"), "vm-123");
        assert_eq!(segment("2001:db8::1"), "2001%3Adb8%3A%3A1");
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn test_config_debug_hides_token() {
        let config = ClientConfig::new("super-secret").with_endpoint("http://localhost/");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert_eq!(config.endpoint, "http://localhost");
    }
}
