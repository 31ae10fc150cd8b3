//! Error types for management API operations.
//!
//! Failures are classified by where they happened so callers can tell
//! "the API rejected this" apart from "the call never completed":
//!
//! - [`ManagementError::Api`] - a non-2xx response was received and decoded
//! - [`ManagementError::Transport`] - no response (connection, timeout, cancellation)
//! - [`ManagementError::Serialization`] - a payload could not be encoded or decoded

use serde::Deserialize;
use std::fmt;

/// Main error type for management API operations.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    /// The remote API answered with a non-2xx status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A request body could not be encoded or a response body could not be decoded.
    #[error("Serialization error while {stage}: {source}")]
    Serialization {
        stage: SerializationStage,
        #[source]
        source: serde_json::Error,
    },

    /// The request could not be built (for example an unusable path segment).
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Which half of the exchange failed to (de)serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationStage {
    EncodingRequest,
    DecodingResponse,
}

impl fmt::Display for SerializationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationStage::EncodingRequest => write!(f, "encoding request body"),
            SerializationStage::DecodingResponse => write!(f, "decoding response body"),
        }
    }
}

/// Structured error returned by the remote API.
///
/// The API reports failures as
/// `{"statusCode": 404, "error": "Not Found", "message": "...", "errorCode": "..."}`.
/// When the body is not in that shape the status line and raw body are kept instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{status} {error}: {message}")]
pub struct ApiError {
    /// HTTP status code of the response.
    #[serde(rename = "statusCode", default)]
    pub status: u16,

    /// Short error name, usually the reason phrase.
    #[serde(default)]
    pub error: String,

    /// Human-readable description.
    #[serde(default)]
    pub message: String,

    /// Machine-readable error code, when the API provides one.
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<String>,
}

impl ApiError {
    /// Build an API error from a failed response.
    ///
    /// The status code always comes from the response itself; the body only
    /// supplies the descriptive fields.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiError>(body) {
            Ok(mut decoded) => {
                decoded.status = status;
                if decoded.error.is_empty() {
                    decoded.error = reason_phrase(status).to_string();
                }
                decoded
            }
            Err(_) => Self {
                status,
                error: reason_phrase(status).to_string(),
                message: String::from_utf8_lossy(body).trim().to_string(),
                error_code: None,
            },
        }
    }

    /// HTTP status code of the failed response.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Machine-readable error code, or an empty string.
    pub fn code(&self) -> &str {
        self.error_code.as_deref().unwrap_or_default()
    }
}

/// Failures that happen before a response is received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The remote host could not be reached.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The request exceeded its deadline.
    #[error("request timed out")]
    Timeout,

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// Any other transport failure.
    #[error("{message}")]
    Other { message: String },
}

impl TransportError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a generic transport error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Errors that can occur while building a [`crate::Management`] client.
///
/// These are configuration mistakes and are reported before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Neither a domain nor a base URL was configured
    #[error("Either a domain or a base URL is required")]
    MissingEndpoint,

    /// The endpoint could not be parsed
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ManagementError {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub(crate) fn encoding(source: serde_json::Error) -> Self {
        Self::Serialization {
            stage: SerializationStage::EncodingRequest,
            source,
        }
    }

    pub(crate) fn decoding(source: serde_json::Error) -> Self {
        Self::Serialization {
            stage: SerializationStage::DecodingResponse,
            source,
        }
    }

    /// HTTP status of an API failure, `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            ManagementError::Api(api) => Some(api.status),
            _ => None,
        }
    }

    /// The decoded API error, if the API answered.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ManagementError::Api(api) => Some(api),
            _ => None,
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, ManagementError::Api(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ManagementError::Transport(_))
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, ManagementError::Serialization { .. })
    }

    /// True for a 404 from the API.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Canonical reason phrase for the status codes the API commonly returns.
fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown Error",
    }
}

// Result type aliases for convenience
pub type ManagementResult<T> = Result<T, ManagementError>;
pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_json_body() {
        let body = br#"{"statusCode":404,"error":"Not Found","message":"The enrollment does not exist.","errorCode":"inexistent_enrollment"}"#;
        let error = ApiError::from_response(404, body);

        assert_eq!(error.status(), 404);
        assert_eq!(error.error, "Not Found");
        assert_eq!(error.message, "The enrollment does not exist.");
        assert_eq!(error.code(), "inexistent_enrollment");
    }

    #[test]
    fn test_api_error_status_comes_from_response() {
        let body = br#"{"statusCode":200,"message":"odd"}"#;
        let error = ApiError::from_response(400, body);

        assert_eq!(error.status(), 400);
        assert_eq!(error.error, "Bad Request");
        assert_eq!(error.code(), "");
    }

    #[test]
    fn test_api_error_from_plain_text_body() {
        let error = ApiError::from_response(502, b"upstream unavailable\n");

        assert_eq!(error.status(), 502);
        assert_eq!(error.error, "Bad Gateway");
        assert_eq!(error.message, "upstream unavailable");
        assert!(error.error_code.is_none());
    }

    #[test]
    fn test_error_classification() {
        let api = ManagementError::from(ApiError::from_response(404, b""));
        assert!(api.is_api());
        assert!(api.is_not_found());
        assert!(!api.is_transport());

        let transport = ManagementError::from(TransportError::connection("refused"));
        assert!(transport.is_transport());
        assert_eq!(transport.status(), None);
        assert!(!transport.is_not_found());
    }

    #[test]
    fn test_serialization_error_display() {
        let source = serde_json::from_str::<u8>("nope").unwrap_err();
        let error = ManagementError::decoding(source);
        assert!(error.is_serialization());
        assert!(error.to_string().contains("decoding response body"));
    }
}
