//! Transport abstraction for talking to the management API.
//!
//! This module separates the wire exchange from the management logic. The
//! [`Transport`] trait is the only place a request leaves the process: it takes
//! a fully built [`HttpRequest`] and hands back the raw [`HttpResponse`].
//!
//! The transport layer is responsible for:
//! - Moving bytes to and from the remote API
//! - Attaching credentials (bearer tokens, refresh, ...)
//! - Connection management
//!
//! The transport layer is NOT responsible for:
//! - Building URIs or query strings
//! - Encoding entities or decoding responses
//! - Interpreting non-2xx statuses (those are still `Ok` responses here)
//! - Retries or backoff
//!
//! # Example Usage
//!
//! ```rust
//! use idm_management::transport::{HttpRequest, InMemoryTransport, Method, Transport};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = InMemoryTransport::new();
//! let url = Url::parse("https://tenant.example.com/api/v2/prompts")?;
//!
//! let response = transport
//!     .send(HttpRequest::new(Method::Put, url).with_body(br#"{"identifier_first":true}"#.to_vec()))
//!     .await?;
//! assert!(response.is_success());
//! # Ok(())
//! # }
//! ```

pub mod in_memory;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{HttpTransport, HttpTransportConfig};
pub use in_memory::{InMemoryTransport, InMemoryTransportStats, RecordedRequest};

use crate::error::TransportError;
use std::fmt;
use std::future::Future;
use url::Url;

/// HTTP methods used by the management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a request without headers or body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a header value, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response as received from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with the given status and body.
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the body is empty or only whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// The single capability the management client needs from the outside world.
///
/// Implementations send one request and return whatever came back. A non-2xx
/// status is a successful exchange from the transport's point of view; only
/// failures to obtain a response are reported as [`TransportError`].
///
/// Implementations must not retry on their own. Cancellation is handled by the
/// caller dropping the returned future, so it must be safe to drop mid-flight.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).send(request)
    }
}
