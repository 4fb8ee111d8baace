//! Request/response channel to the Unity editor.
//!
//! Every compact operation issues exactly one `{ method, params }` request
//! through a [`HostBridge`] and inspects the `success` flag of the answer.
//! The bridge never retries; a failure is reported to the caller as-is.

use crate::error::CompactError;
use crate::records::{display_string, truthy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Boxed future returned by [`HostBridge::send_request`].
pub type BridgeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BridgeResponse, CompactError>> + Send + 'a>>;

/// A request for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub method: String,
    pub params: Value,
}

impl BridgeRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// The editor's raw answer. The payload lives under a method-specific key
/// (`data`, `logs`, `hierarchy`, `gameObject`) or is the body itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BridgeResponse(pub Value);

impl BridgeResponse {
    /// Whether the editor reported success. A missing flag counts as failure.
    pub fn success(&self) -> bool {
        self.0.get("success").is_some_and(truthy)
    }

    /// The editor's error or status message, if any.
    pub fn message(&self) -> Option<String> {
        self.0
            .get("message")
            .filter(|m| truthy(m))
            .map(display_string)
    }

    pub fn body(&self) -> &Value {
        &self.0
    }

    pub fn into_body(self) -> Value {
        self.0
    }
}

/// Transport to the editor. Implementations must be usable from any task.
///
/// Uses a boxed future so the trait stays dyn-compatible and can be shared
/// as `Arc<dyn HostBridge>`.
pub trait HostBridge: Send + Sync {
    fn send_request(&self, request: BridgeRequest) -> BridgeFuture<'_>;
}

/// Send `request` and return the response body if the editor reported
/// success. A `success: false` answer becomes
/// [`CompactError::ToolExecution`] carrying the editor's message, or
/// `fallback_message` when it sent none.
pub async fn fetch(
    bridge: &dyn HostBridge,
    request: BridgeRequest,
    fallback_message: &str,
) -> Result<Value, CompactError> {
    let method = request.method.clone();
    let start = Instant::now();
    let response = bridge.send_request(request).await?;
    debug!(
        "Bridge {method} answered in {:.0}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    if !response.success() {
        let message = response
            .message()
            .unwrap_or_else(|| fallback_message.to_string());
        warn!("Bridge {method} failed: {message}");
        return Err(CompactError::ToolExecution(message));
    }

    trace!("Bridge {method} body: {}", preview(response.body()));
    Ok(response.into_body())
}

fn preview(value: &Value) -> String {
    let text = value.to_string();
    let head: String = text.chars().take(300).collect();
    if head.len() < text.len() {
        format!("{head}...")
    } else {
        head
    }
}

// ── HttpBridge ─────────────────────────────────────────────────────

/// Default request timeout for [`HttpBridge`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts each request as JSON to an editor-side HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpBridge {
    client: reqwest::Client,
    url: String,
}

impl HttpBridge {
    /// Create a bridge for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, CompactError> {
        Self::with_timeout(url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, CompactError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("unity-compact/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CompactError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, request: BridgeRequest) -> Result<BridgeResponse, CompactError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompactError::Transport(format!("request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| CompactError::Transport(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(CompactError::Transport(format!("HTTP {status}: {text}")));
        }

        serde_json::from_str(&text)
            .map(BridgeResponse)
            .map_err(|e| CompactError::Transport(format!("invalid JSON from editor: {e}")))
    }
}

impl HostBridge for HttpBridge {
    fn send_request(&self, request: BridgeRequest) -> BridgeFuture<'_> {
        Box::pin(self.post(request))
    }
}

// ── StaticBridge ───────────────────────────────────────────────────

/// Answers from canned responses keyed by method, and remembers every
/// request it saw. For tests and offline demos.
#[derive(Debug, Default)]
pub struct StaticBridge {
    responses: HashMap<String, Value>,
    requests: Mutex<Vec<BridgeRequest>>,
}

impl StaticBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` with `body` (builder pattern).
    pub fn with_response(mut self, method: impl Into<String>, body: Value) -> Self {
        self.responses.insert(method.into(), body);
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<BridgeRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HostBridge for StaticBridge {
    fn send_request(&self, request: BridgeRequest) -> BridgeFuture<'_> {
        let answer = self.responses.get(&request.method).cloned().ok_or_else(|| {
            CompactError::Transport(format!("no response configured for '{}'", request.method))
        });
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Box::pin(async move { answer.map(BridgeResponse) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_success_flag_is_failure() {
        assert!(!BridgeResponse(json!({"data": []})).success());
        assert!(BridgeResponse(json!({"success": true})).success());
    }

    #[test]
    fn empty_message_is_ignored() {
        assert_eq!(BridgeResponse(json!({"message": ""})).message(), None);
        assert_eq!(
            BridgeResponse(json!({"message": "boom"})).message().as_deref(),
            Some("boom")
        );
    }

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let bridge = StaticBridge::new().with_response("ping", json!({"success": true, "data": 1}));
        let body = fetch(&bridge, BridgeRequest::new("ping", json!({})), "failed")
            .await
            .unwrap();
        assert_eq!(body["data"], 1);
        assert_eq!(bridge.requests().len(), 1);
    }

    #[tokio::test]
    async fn fetch_surfaces_host_message() {
        let bridge = StaticBridge::new()
            .with_response("ping", json!({"success": false, "message": "Editor is compiling"}));
        let err = fetch(&bridge, BridgeRequest::new("ping", json!({})), "failed")
            .await
            .unwrap_err();
        assert!(matches!(err, CompactError::ToolExecution(ref m) if m == "Editor is compiling"));
    }

    #[tokio::test]
    async fn fetch_uses_fallback_message() {
        let bridge = StaticBridge::new().with_response("ping", json!({"success": false}));
        let err = fetch(&bridge, BridgeRequest::new("ping", json!({})), "Failed to ping")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Tool execution failed: Failed to ping");
    }

    #[tokio::test]
    async fn unknown_method_is_transport_error() {
        let bridge = StaticBridge::new();
        let err = fetch(&bridge, BridgeRequest::new("nope", json!({})), "failed")
            .await
            .unwrap_err();
        assert!(matches!(err, CompactError::Transport(_)));
    }

    #[test]
    fn http_bridge_keeps_url() {
        let bridge = HttpBridge::new("http://localhost:8090/mcp").unwrap();
        assert_eq!(bridge.url(), "http://localhost:8090/mcp");
    }
}
