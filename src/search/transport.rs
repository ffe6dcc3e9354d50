use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Duration;

/// One page request against the search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub query: String,
    pub cursor: Option<i64>,
    pub count: usize,
    pub timeout: Duration,
}

/// Source of raw search payloads.
///
/// Implementations absorb every failure (network, status, decoding) and
/// report it as `None`; the paginator never sees an error.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Option<Value>;
}
