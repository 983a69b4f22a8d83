/// HTTP transport seam
///
/// This module defines the contract between the session layer and the
/// actual HTTP stack. The session only sees [`ApiRequest`] in and
/// [`ApiResponse`] out; whether the bytes travel over reqwest or a scripted
/// test double is an implementation detail behind [`HttpTransport`].
///
/// # Implementations
///
/// - [`HttpClient`]: reqwest-backed transport with a fixed per-request
///   timeout
/// - [`MockTransport`]: deterministic scripted transport for tests and
///   demos
use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub mod http;
pub mod mock;

pub use http::HttpClient;
pub use mock::MockTransport;

/// Transport-level error: the request produced no usable response
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Request exceeded the fixed timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection could not be established or was dropped
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request could not be constructed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// HTTP method subset used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Method name as sent on the wire
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

/// An outgoing API request
///
/// Paths are relative to the configured base URL and start with `/`.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Creates a request with no query, body, or bearer token
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    /// Creates a GET request
    pub fn get(path: impl Into<String>) -> Self {
        ApiRequest::new(Method::Get, path)
    }

    /// Creates a POST request with a JSON body
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        let mut request = ApiRequest::new(Method::Post, path);
        request.body = Some(body);
        request
    }

    /// Creates a PATCH request with a JSON body
    pub fn patch(path: impl Into<String>, body: serde_json::Value) -> Self {
        let mut request = ApiRequest::new(Method::Patch, path);
        request.body = Some(body);
        request
    }

    /// Appends a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets (or clears) the bearer token
    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// A received API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,

    /// Raw response body
    pub body: Bytes,

    /// Parsed `x-total-count` header, when present
    pub total_count: Option<u64>,
}

/// Minimal shape of a structured error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiResponse {
    /// Builds a response from a status and JSON value (test/demo helper)
    pub fn json_value(status: u16, value: &serde_json::Value) -> Self {
        ApiResponse {
            status,
            body: Bytes::from(value.to_string()),
            total_count: None,
        }
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserializes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Extracts the `message` field from a structured error body
    pub fn message(&self) -> Option<String> {
        self.json::<ErrorBody>().ok().and_then(|b| b.message)
    }
}

/// The contract between the session layer and the HTTP stack
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and returns the response
    ///
    /// A non-2xx status is a valid response, not a transport error;
    /// classification happens in the session layer.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
