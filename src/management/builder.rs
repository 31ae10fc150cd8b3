//! Builder pattern for configuring management clients.
//!
//! A client needs an endpoint (a tenant domain or a full base URL) and a
//! [`Transport`]. Everything else has a default.

use crate::error::{BuildError, BuildResult};
use crate::management::Management;
use crate::transport::Transport;
use std::time::Duration;
use url::Url;

const DEFAULT_API_PATH: &str = "api/v2";

/// Configuration for the management API endpoint.
#[derive(Debug, Clone)]
pub struct ManagementConfig {
    /// Tenant domain, e.g. `tenant.eu.example.com`. Used with `https` when no
    /// base URL is set.
    pub domain: Option<String>,

    /// Full base URL, e.g. `http://localhost:8080`. Takes precedence over the domain.
    pub base_url: Option<String>,

    /// Path of the API root below the base URL. Defaults to `api/v2`.
    pub api_path: String,

    /// Deadline applied to calls whose context doesn't carry one.
    pub request_timeout: Option<Duration>,

    /// Headers sent with every request.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            domain: None,
            base_url: None,
            api_path: DEFAULT_API_PATH.to_string(),
            request_timeout: None,
            default_headers: Vec::new(),
        }
    }
}

impl ManagementConfig {
    /// Read the endpoint from the environment.
    ///
    /// `IDM_BASE_URL` wins over `IDM_DOMAIN`; one of them must be set.
    /// `IDM_REQUEST_TIMEOUT_SECS` sets the default call deadline.
    pub fn from_env() -> BuildResult<Self> {
        let mut config = Self {
            domain: std::env::var("IDM_DOMAIN").ok(),
            base_url: std::env::var("IDM_BASE_URL").ok(),
            ..Self::default()
        };
        if let Ok(raw) = std::env::var("IDM_REQUEST_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| BuildError::InvalidConfiguration {
                    message: format!("IDM_REQUEST_TIMEOUT_SECS must be a number of seconds: {e}"),
                })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    /// Resolve the API root URL, always ending in `/`.
    pub fn api_root(&self) -> BuildResult<Url> {
        let raw = match (&self.base_url, &self.domain) {
            (Some(base_url), _) if !base_url.trim().is_empty() => base_url.trim().to_string(),
            (_, Some(domain)) if !domain.trim().is_empty() => {
                format!("https://{}", domain.trim().trim_end_matches('/'))
            }
            _ => return Err(BuildError::MissingEndpoint),
        };

        let mut url = Url::parse(&raw).map_err(|e| BuildError::InvalidBaseUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(BuildError::InvalidBaseUrl {
                url: raw,
                reason: "scheme must be http or https".to_string(),
            });
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(BuildError::InvalidBaseUrl {
                url: raw,
                reason: "base URL must not carry a query or fragment".to_string(),
            });
        }

        {
            let mut segments = url.path_segments_mut().map_err(|_| BuildError::InvalidBaseUrl {
                url: raw.clone(),
                reason: "URL cannot be a base".to_string(),
            })?;
            segments.pop_if_empty();
            for segment in self.api_path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
            // Trailing slash so relative joins stay below the API root.
            segments.push("");
        }
        Ok(url)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> BuildResult<()> {
        self.api_root()?;
        for (name, _) in &self.default_headers {
            if name.trim().is_empty() {
                return Err(BuildError::InvalidConfiguration {
                    message: "Default header names cannot be empty".to_string(),
                });
            }
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(BuildError::InvalidConfiguration {
                message: "Request timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for configuring and creating [`Management`] clients.
///
/// # Examples
///
/// ```rust
/// use idm_management::ManagementBuilder;
/// use idm_management::transport::InMemoryTransport;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let management = ManagementBuilder::new(InMemoryTransport::new())
///     .with_domain("tenant.example.com")
///     .with_request_timeout(Duration::from_secs(10))
///     .build()?;
/// assert_eq!(management.api_root().as_str(), "https://tenant.example.com/api/v2/");
/// # Ok(())
/// # }
/// ```
pub struct ManagementBuilder<T> {
    transport: T,
    config: ManagementConfig,
}

impl<T: Transport> ManagementBuilder<T> {
    /// Create a builder around a transport with the default configuration.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: ManagementConfig::default(),
        }
    }

    /// Start from an existing configuration.
    pub fn with_config(mut self, config: ManagementConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the tenant domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.domain = Some(domain.into());
        self
    }

    /// Set a full base URL, e.g. for a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the path of the API root below the base URL.
    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.config.api_path = api_path.into();
        self
    }

    /// Set the deadline applied when the request context has none.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Add a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the configured client.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if no endpoint is configured or it is not a
    /// usable http(s) URL.
    pub fn build(self) -> BuildResult<Management<T>> {
        self.config.validate()?;
        let api_root = self.config.api_root()?;
        Ok(Management::from_parts(self.transport, self.config, api_root))
    }
}

#[cfg(feature = "http")]
impl ManagementBuilder<crate::transport::HttpTransport> {
    /// Builder for an HTTP client configured from the environment.
    ///
    /// See [`ManagementConfig::from_env`] and
    /// [`HttpTransportConfig::from_env`](crate::transport::HttpTransportConfig::from_env).
    pub fn from_env() -> BuildResult<Self> {
        let transport_config = crate::transport::HttpTransportConfig::from_env()?;
        let transport = crate::transport::HttpTransport::new(transport_config)?;
        Ok(Self::new(transport).with_config(ManagementConfig::from_env()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::InMemoryTransport;

    fn config() -> ManagementConfig {
        ManagementConfig::default()
    }

    #[test]
    fn test_domain_endpoint() {
        let config = ManagementConfig {
            domain: Some("tenant.example.com".to_string()),
            ..config()
        };
        assert_eq!(
            config.api_root().unwrap().as_str(),
            "https://tenant.example.com/api/v2/"
        );
    }

    #[test]
    fn test_base_url_wins_over_domain() {
        let config = ManagementConfig {
            domain: Some("tenant.example.com".to_string()),
            base_url: Some("http://127.0.0.1:8080/prefix/".to_string()),
            ..config()
        };
        assert_eq!(
            config.api_root().unwrap().as_str(),
            "http://127.0.0.1:8080/prefix/api/v2/"
        );
    }

    #[test]
    fn test_custom_api_path() {
        let config = ManagementConfig {
            domain: Some("tenant.example.com".to_string()),
            api_path: "/management/v3/".to_string(),
            ..config()
        };
        assert_eq!(
            config.api_root().unwrap().as_str(),
            "https://tenant.example.com/management/v3/"
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(config().validate(), Err(BuildError::MissingEndpoint)));

        let bad_scheme = ManagementConfig {
            base_url: Some("ftp://tenant.example.com".to_string()),
            ..config()
        };
        assert!(matches!(
            bad_scheme.validate(),
            Err(BuildError::InvalidBaseUrl { .. })
        ));

        let unparsable = ManagementConfig {
            base_url: Some("not a url".to_string()),
            ..config()
        };
        assert!(matches!(
            unparsable.validate(),
            Err(BuildError::InvalidBaseUrl { .. })
        ));

        let zero_timeout = ManagementConfig {
            domain: Some("tenant.example.com".to_string()),
            request_timeout: Some(Duration::ZERO),
            ..config()
        };
        assert!(matches!(
            zero_timeout.validate(),
            Err(BuildError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_builder_pattern() {
        let management = ManagementBuilder::new(InMemoryTransport::new())
            .with_domain("tenant.example.com")
            .with_default_header("X-Tenant", "acme")
            .build()
            .unwrap();

        assert_eq!(
            management.api_root().as_str(),
            "https://tenant.example.com/api/v2/"
        );
        assert_eq!(
            management.config().default_headers,
            vec![("X-Tenant".to_string(), "acme".to_string())]
        );
    }

    #[test]
    fn test_builder_without_endpoint_fails() {
        let result = ManagementBuilder::new(InMemoryTransport::new()).build();
        assert!(matches!(result, Err(BuildError::MissingEndpoint)));
    }
}
