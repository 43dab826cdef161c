// crates/customer-contract/src/client.rs
// ============================================================================
// Module: Customer API Client
// Description: HTTP client for the customer REST resource.
// Purpose: Issue CRUD requests over one configured client with transcripts.
// Dependencies: reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! [`CustomerApiClient`] wraps a single `reqwest` client whose default
//! headers are fixed at construction. Every exchange is appended to a
//! transcript so reports can show exactly what was sent and received.
//! Requests are never retried: a transport error is returned as-is.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use reqwest::Client;
use reqwest::Method;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::ConfigError;
use crate::config::SuiteConfig;
use crate::customer::Customer;
use crate::customer::NewCustomer;
use crate::error::ContractError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Collection path for the customer resource.
pub const CUSTOMER_PATH: &str = "/customer";

/// Maximum body characters quoted in decode errors.
const BODY_EXCERPT_CHARS: usize = 256;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One request/response exchange captured by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// 1-based position in the transcript.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Request path relative to the base URL.
    pub path: String,
    /// JSON request body when present.
    pub request: Option<Value>,
    /// Response status when a response arrived.
    pub status: Option<u16>,
    /// Raw response body when a response arrived.
    pub response: Option<String>,
    /// Transport error message when no response arrived.
    pub error: Option<String>,
}

/// Captured HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Request label, e.g. `DELETE /customer/6`.
    pub operation: String,
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Decode`] when the body is not the expected shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ContractError> {
        serde_json::from_str(&self.body).map_err(|err| ContractError::Decode {
            operation: self.operation.clone(),
            message: format!("{err}; body: {}", excerpt(&self.body)),
        })
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP client bound to one customer API base URL.
#[derive(Clone)]
pub struct CustomerApiClient {
    /// Base URL of the API under test.
    base_url: Url,
    /// Shared `reqwest` client with default headers applied.
    client: Client,
    /// Exchange log shared across clones.
    transcript: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl CustomerApiClient {
    /// Builds a client from validated suite configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Config`] for invalid URLs or headers and
    /// [`ContractError::ClientBuild`] when `reqwest` rejects the settings.
    pub fn new(config: &SuiteConfig) -> Result<Self, ContractError> {
        let base_url = config.parsed_base_url()?;
        let mut builder = Client::builder().default_headers(default_headers(config)?);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ContractError::ClientBuild)?;
        Ok(Self::new_with_client(base_url, client))
    }

    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub fn new_with_client(base_url: Url, client: Client) -> Self {
        Self {
            base_url,
            client,
            transcript: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the base URL of the API under test.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns a snapshot of the transcript entries.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Issues `POST /customer`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Transport`] when no response is received.
    pub async fn create_customer(&self, body: &NewCustomer) -> Result<ApiResponse, ContractError> {
        self.send(Method::POST, CUSTOMER_PATH.to_string(), Some(encode(body)?)).await
    }

    /// Issues `GET /customer`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Transport`] when no response is received.
    pub async fn list_customers(&self) -> Result<ApiResponse, ContractError> {
        self.send(Method::GET, CUSTOMER_PATH.to_string(), None).await
    }

    /// Issues `GET /customer/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Transport`] when no response is received.
    pub async fn get_customer(&self, id: i64) -> Result<ApiResponse, ContractError> {
        self.send(Method::GET, item_path(id), None).await
    }

    /// Issues `PUT /customer/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Transport`] when no response is received.
    pub async fn update_customer(
        &self,
        id: i64,
        body: &Customer,
    ) -> Result<ApiResponse, ContractError> {
        self.send(Method::PUT, item_path(id), Some(encode(body)?)).await
    }

    /// Issues `DELETE /customer/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Transport`] when no response is received.
    pub async fn delete_customer(&self, id: i64) -> Result<ApiResponse, ContractError> {
        self.send(Method::DELETE, item_path(id), None).await
    }

    /// Sends one request and records the exchange.
    async fn send(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<ApiResponse, ContractError> {
        let operation = format!("{method} {path}");
        let url = self.endpoint(&path)?;
        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = &body {
            request = request.json(body);
        }
        let result = match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                response.text().await.map(|text| (status, text))
            }
            Err(err) => Err(err),
        };
        match result {
            Ok((status, text)) => {
                self.record(&method, &path, body, Some(status), Some(text.clone()), None);
                Ok(ApiResponse {
                    operation,
                    status,
                    body: text,
                })
            }
            Err(source) => {
                self.record(&method, &path, body, None, None, Some(source.to_string()));
                Err(ContractError::Transport {
                    operation,
                    source,
                })
            }
        }
    }

    /// Resolves a path against the base URL, keeping any base path prefix.
    fn endpoint(&self, path: &str) -> Result<Url, ContractError> {
        let joined = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&joined).map_err(|err| {
            ContractError::Config(ConfigError::Invalid(format!("invalid request url {joined}: {err}")))
        })
    }

    /// Appends an exchange to the transcript.
    fn record(
        &self,
        method: &Method,
        path: &str,
        request: Option<Value>,
        status: Option<u16>,
        response: Option<String>,
        error: Option<String>,
    ) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(TranscriptEntry {
            sequence,
            method: method.to_string(),
            path: path.to_string(),
            request,
            status,
            response,
            error,
        });
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the fixed header set applied to every request.
fn default_headers(config: &SuiteConfig) -> Result<HeaderMap, ContractError> {
    let mut headers = HeaderMap::new();
    if config.accept_json {
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    }
    for (name, value) in &config.extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::Invalid(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ConfigError::Invalid(format!("invalid value for header {name}")))?;
        headers.insert(name, value);
    }
    if let Some(token) = &config.auth_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ConfigError::Invalid("auth_token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Returns the item path for an identifier.
fn item_path(id: i64) -> String {
    format!("{CUSTOMER_PATH}/{id}")
}

/// Serializes a request body.
fn encode<T: Serialize>(body: &T) -> Result<Value, ContractError> {
    serde_json::to_value(body).map_err(|err| ContractError::Decode {
        operation: "encode request body".to_string(),
        message: err.to_string(),
    })
}

/// Truncates a body for error messages.
fn excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_CHARS {
        return body.to_string();
    }
    let mut out: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
    out.push_str("...");
    out
}
