//! In-memory stand-in for the management API.
//!
//! This module provides a thread-safe, in-process implementation of the
//! [`Transport`] trait that behaves like a small document store keyed by
//! request path. It's designed for testing and development against the
//! client without a live tenant.
//!
//! # Behavior
//!
//! * `POST {collection}` with a JSON object stores it under a server-assigned
//!   `id` and stamps `created_at` / `updated_at`; `201` with the stored document
//! * `POST` without a body acknowledges an action; `204`
//! * `GET {path}` returns the stored document, or lists direct children of
//!   `{path}` in insertion order (wrapped with pagination metadata when
//!   `include_totals=true` and a list key is registered)
//! * `PUT {path}` replaces (or creates) the document at `{path}`
//! * `PATCH {path}` merges top-level keys into the existing document
//! * `DELETE {path}` removes the document; `204`
//! * Unknown paths answer `404` with an API error body
//!
//! Failures can be injected with [`InMemoryTransport::fail_next`] and slow
//! responses simulated with [`InMemoryTransport::with_latency`].
//!
//! Every request is recorded and kept until [`InMemoryTransport::take_requests`]
//! or [`InMemoryTransport::clear`] is called, so the log grows with the number
//! of requests. Long-running uses should drain it periodically.
//!
//! # Example Usage
//!
//! ```rust
//! use idm_management::transport::InMemoryTransport;
//! use idm_management::managers::SelfServiceProfile;
//! use serde_json::json;
//!
//! # async fn example() {
//! let transport = InMemoryTransport::new();
//! transport.register::<SelfServiceProfile>().await;
//! transport.seed("guardian/policies", json!(["all-applications"])).await;
//! # }
//! ```

use crate::error::TransportError;
use crate::resource::ManagedResource;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use chrono::{SecondsFormat, Utc};
use log::{debug, trace};
use serde_json::{Map, Value, json};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_API_PREFIX: &str = "/api/v2";

/// Thread-safe in-memory transport.
///
/// Documents are stored by their path relative to the API prefix
/// (`self-service-profiles/{id}`), in the percent-encoded form the client
/// sends. Clones share the same state.
#[derive(Clone)]
pub struct InMemoryTransport {
    state: Arc<RwLock<State>>,
    api_prefix: String,
    latency: Option<Duration>,
}

#[derive(Default)]
struct State {
    documents: HashMap<String, StoredDocument>,
    // collection path -> key the list response wraps items in
    list_keys: HashMap<String, String>,
    next_seq: u64,
    request_count: usize,
    requests: Vec<RecordedRequest>,
    failures: VecDeque<TransportError>,
}

struct StoredDocument {
    seq: u64,
    body: Value,
}

/// A request as seen by the in-memory transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path relative to the API prefix.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Value of a query parameter, if it was sent.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Statistics about the current state of the in-memory transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryTransportStats {
    /// Number of stored documents
    pub document_count: usize,
    /// Number of requests received, including failed ones and ones already
    /// drained from the log
    pub request_count: usize,
}

impl InMemoryTransport {
    /// Create an empty transport serving paths under `/api/v2`.
    pub fn new() -> Self {
        Self::with_api_prefix(DEFAULT_API_PREFIX)
    }

    /// Create an empty transport serving paths under a custom prefix.
    pub fn with_api_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            state: Arc::new(RwLock::new(State::default())),
            api_prefix: prefix.trim_end_matches('/').to_string(),
            latency: None,
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Register the list key for a resource collection.
    pub async fn register<R: ManagedResource>(&self) {
        self.register_collection(R::COLLECTION.join("/"), R::LIST_KEY)
            .await;
    }

    /// Register the key list responses of `collection` are wrapped in.
    pub async fn register_collection(
        &self,
        collection: impl Into<String>,
        list_key: impl Into<String>,
    ) {
        let mut state = self.state.write().await;
        state.list_keys.insert(collection.into(), list_key.into());
    }

    /// Store a document at `path` as if the API already had it.
    pub async fn seed(&self, path: impl Into<String>, body: Value) {
        let mut state = self.state.write().await;
        state.insert(path.into(), body);
    }

    /// Read the document stored at `path`.
    pub async fn document(&self, path: &str) -> Option<Value> {
        let state = self.state.read().await;
        state.documents.get(path).map(|doc| doc.body.clone())
    }

    /// Make the next request fail with `error` before reaching the store.
    pub async fn fail_next(&self, error: TransportError) {
        let mut state = self.state.write().await;
        state.failures.push_back(error);
    }

    /// All requests recorded since the log was last drained, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        let state = self.state.read().await;
        state.requests.clone()
    }

    /// Drain the request log, returning its entries oldest first.
    ///
    /// Documents and the request count are kept.
    pub async fn take_requests(&self) -> Vec<RecordedRequest> {
        let mut state = self.state.write().await;
        std::mem::take(&mut state.requests)
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<RecordedRequest> {
        let state = self.state.read().await;
        state.requests.last().cloned()
    }

    /// Get statistics for debugging and assertions.
    pub async fn stats(&self) -> InMemoryTransportStats {
        let state = self.state.read().await;
        InMemoryTransportStats {
            document_count: state.documents.len(),
            request_count: state.request_count,
        }
    }

    /// Clear all documents, registrations and recorded requests.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = State::default();
    }

    fn relative_path(&self, request: &HttpRequest) -> Option<String> {
        let path = request.url.path().trim_end_matches('/');
        let relative = path.strip_prefix(&self.api_prefix)?;
        Some(relative.trim_start_matches('/').to_string())
    }

    async fn handle(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let query: Vec<(String, String)> = request
            .url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        let body = match request.body.as_deref() {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => {
                match serde_json::from_slice::<Value>(bytes) {
                    Ok(value) => Some(value),
                    Err(e) => return Ok(error_response(400, &format!("Invalid JSON body: {e}"))),
                }
            }
            _ => None,
        };
        let path = self.relative_path(&request);

        let mut state = self.state.write().await;
        state.request_count += 1;
        state.requests.push(RecordedRequest {
            method: request.method,
            path: path.clone().unwrap_or_default(),
            query: query.clone(),
            headers: request.headers.clone(),
            body: body.clone(),
        });

        if let Some(failure) = state.failures.pop_front() {
            debug!("In-memory transport injecting failure: {failure}");
            return Err(failure);
        }

        let Some(path) = path else {
            return Ok(error_response(404, "Path is outside the API prefix"));
        };
        trace!("In-memory {} /{} {:?}", request.method, path, body);

        let response = match request.method {
            Method::Get => state.get(&path, &query),
            Method::Post => state.post(&path, body),
            Method::Put => state.put(&path, body),
            Method::Patch => state.patch(&path, body),
            Method::Delete => state.delete(&path),
        };
        Ok(response)
    }
}

impl fmt::Debug for InMemoryTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTransport")
            .field("api_prefix", &self.api_prefix)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for InMemoryTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.handle(request).await
    }
}

impl State {
    fn insert(&mut self, path: String, body: Value) {
        // Replacing keeps the original position in listings.
        let seq = match self.documents.get(&path) {
            Some(existing) => existing.seq,
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };
        self.documents.insert(path, StoredDocument { seq, body });
    }

    fn children(&self, path: &str) -> Vec<&StoredDocument> {
        let prefix = format!("{path}/");
        let mut children: Vec<&StoredDocument> = self
            .documents
            .iter()
            .filter(|(key, _)| {
                key.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .map(|(_, doc)| doc)
            .collect();
        children.sort_by_key(|doc| doc.seq);
        children
    }

    fn get(&self, path: &str, query: &[(String, String)]) -> HttpResponse {
        if let Some(doc) = self.documents.get(path) {
            return json_response(200, &doc.body);
        }

        let list_key = self.list_keys.get(path);
        let children = self.children(path);
        if children.is_empty() && list_key.is_none() {
            return error_response(404, &format!("The resource at '{path}' does not exist."));
        }

        let param = |name: &str| {
            query
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };
        let total = children.len();
        let page = param("page").and_then(|v| v.parse::<usize>().ok()).unwrap_or(0);
        let per_page = param("per_page")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(total.max(1));
        let start = page.saturating_mul(per_page);
        let items: Vec<Value> = children
            .into_iter()
            .skip(start)
            .take(per_page)
            .map(|doc| doc.body.clone())
            .collect();

        match (list_key, param("include_totals")) {
            (Some(key), Some("true")) => {
                let length = items.len();
                let mut wrapped = Map::new();
                wrapped.insert(key.clone(), Value::Array(items));
                wrapped.insert("start".to_string(), json!(start));
                wrapped.insert("limit".to_string(), json!(per_page));
                wrapped.insert("length".to_string(), json!(length));
                wrapped.insert("total".to_string(), json!(total));
                json_response(200, &Value::Object(wrapped))
            }
            _ => json_response(200, &Value::Array(items)),
        }
    }

    fn post(&mut self, path: &str, body: Option<Value>) -> HttpResponse {
        let Some(body) = body else {
            return HttpResponse::new(204, Vec::new());
        };
        let Value::Object(mut fields) = body else {
            return error_response(400, "Payload validation error: expected an object.");
        };

        let id = match fields.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        fields.insert("id".to_string(), Value::String(id.clone()));
        fields.insert("created_at".to_string(), Value::String(now.clone()));
        fields.insert("updated_at".to_string(), Value::String(now));

        let stored = Value::Object(fields);
        self.insert(format!("{path}/{id}"), stored.clone());
        json_response(201, &stored)
    }

    fn put(&mut self, path: &str, body: Option<Value>) -> HttpResponse {
        let body = body.unwrap_or(Value::Object(Map::new()));
        self.insert(path.to_string(), body.clone());
        json_response(200, &body)
    }

    fn patch(&mut self, path: &str, body: Option<Value>) -> HttpResponse {
        let Some(doc) = self.documents.get_mut(path) else {
            return error_response(404, &format!("The resource at '{path}' does not exist."));
        };
        let Some(Value::Object(changes)) = body else {
            return error_response(400, "Payload validation error: expected an object.");
        };

        match &mut doc.body {
            Value::Object(existing) => {
                for (key, value) in changes {
                    existing.insert(key, value);
                }
                if existing.contains_key("updated_at") {
                    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
                    existing.insert("updated_at".to_string(), Value::String(now));
                }
            }
            other => *other = Value::Object(changes),
        }
        json_response(200, &doc.body)
    }

    fn delete(&mut self, path: &str) -> HttpResponse {
        match self.documents.remove(path) {
            Some(_) => HttpResponse::new(204, Vec::new()),
            None => error_response(404, &format!("The resource at '{path}' does not exist.")),
        }
    }
}

fn json_response(status: u16, body: &Value) -> HttpResponse {
    let mut response = HttpResponse::new(status, body.to_string().into_bytes());
    response
        .headers
        .push(("Content-Type".to_string(), "application/json".to_string()));
    response
}

fn error_response(status: u16, message: &str) -> HttpResponse {
    let (error, code) = match status {
        400 => ("Bad Request", "invalid_body"),
        404 => ("Not Found", "inexistent_resource"),
        _ => ("Error", "unknown"),
    };
    json_response(
        status,
        &json!({
            "statusCode": status,
            "error": error,
            "message": message,
            "errorCode": code,
        }),
    )
}
