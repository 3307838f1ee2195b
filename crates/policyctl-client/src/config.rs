//! Connection configuration for the policy service client.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{ClientError, Result};

/// Default policy service endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Configuration for the policy service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service endpoint, including scheme (`http://` or `https://`).
    pub endpoint: String,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Bearer token sent with every call.
    pub token: Option<String>,

    /// Extra CA certificate (PEM) trusted for `https://` endpoints.
    pub ca_cert_path: Option<PathBuf>,

    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            token: None,
            ca_cert_path: None,
            user_agent: format!("policyctl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parses and checks the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] if the endpoint is not an
    /// absolute `http` or `https` URL with a host.
    pub fn endpoint_url(&self) -> Result<Url> {
        let invalid = |reason: String| ClientError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        };
        let url = Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme '{other}'"))),
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        Ok(url)
    }

    /// Returns true if the endpoint is a valid `https` URL. The scheme is
    /// matched case-insensitively.
    pub fn uses_tls(&self) -> bool {
        self.endpoint_url().is_ok_and(|url| url.scheme() == "https")
    }
}

/// Builder for `ClientConfig`.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    endpoint: Option<String>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    token: Option<String>,
    ca_cert_path: Option<PathBuf>,
}

impl ClientConfigBuilder {
    /// Sets the endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the bearer token. Empty tokens are ignored.
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Sets the CA certificate path.
    pub fn ca_cert(mut self, path: Option<PathBuf>) -> Self {
        self.ca_cert_path = path;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            endpoint: self.endpoint.unwrap_or(defaults.endpoint),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            token: self.token,
            ca_cert_path: self.ca_cert_path,
            user_agent: defaults.user_agent,
        }
    }
}
