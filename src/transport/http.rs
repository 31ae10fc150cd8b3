//! HTTP transport backed by `reqwest`.
//!
//! Sends requests to the live API with a static bearer token. Token
//! acquisition and refresh are left to the caller: build the transport with a
//! token that is valid for the lifetime of the client, or wrap your own
//! [`Transport`] around a refreshing credential source.

use crate::error::{BuildError, BuildResult, TransportError};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use log::debug;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("idm-management/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Bearer token attached to every request.
    pub api_token: String,

    /// Per-request timeout enforced by the HTTP client itself.
    pub timeout: Duration,

    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl HttpTransportConfig {
    /// Create a configuration with the default timeout and user agent.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Read the token from `IDM_API_TOKEN` and an optional timeout in seconds
    /// from `IDM_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> BuildResult<Self> {
        let token = std::env::var("IDM_API_TOKEN").map_err(|_| BuildError::InvalidConfiguration {
            message: "IDM_API_TOKEN is not set".to_string(),
        })?;
        let mut config = Self::new(token);
        if let Ok(raw) = std::env::var("IDM_HTTP_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| BuildError::InvalidConfiguration {
                    message: format!("IDM_HTTP_TIMEOUT_SECS must be a number of seconds: {e}"),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`Transport`] that sends requests over HTTPS with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    api_token: String,
}

impl HttpTransport {
    /// Create a transport from configuration.
    pub fn new(config: HttpTransportConfig) -> BuildResult<Self> {
        if config.api_token.trim().is_empty() {
            return Err(BuildError::InvalidConfiguration {
                message: "API token must not be empty".to_string(),
            });
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| BuildError::InvalidConfiguration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_token: config.api_token,
        })
    }

    /// Create a transport around a pre-built `reqwest::Client` (for testing).
    pub fn with_client(client: Client, api_token: impl Into<String>) -> Self {
        Self {
            client,
            api_token: api_token.into(),
        }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("HTTP {} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(Self::method(request.method), request.url)
            .bearer_auth(&self.api_token);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::connection(error.to_string())
    } else {
        TransportError::other(error.to_string())
    }
}
