use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::search::transport::{PageRequest, SearchTransport};

const ACCEPT: &str = "application/json,text/plain;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// HTTP transport for the public user-search endpoint.
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_str(user_agent)?);
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page and decode it, surfacing every failure as an error.
    pub async fn fetch_json(&self, request: &PageRequest) -> Result<Value> {
        let count = request.count.to_string();
        let cursor = request.cursor.unwrap_or(0).to_string();
        let params = [
            ("keyword", request.query.as_str()),
            ("count", count.as_str()),
            ("cursor", cursor.as_str()),
            ("source", "discover"),
            ("lang", "en"),
        ];

        tracing::debug!(
            "Fetching search page: keyword={} cursor={} count={}",
            request.query,
            cursor,
            count
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .timeout(request.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "Received non-OK status {} for keyword '{}'",
                response.status(),
                request.query
            )));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl SearchTransport for SearchClient {
    async fn fetch_page(&self, request: &PageRequest) -> Option<Value> {
        match self.fetch_json(request).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!("Search request failed for '{}': {}", request.query, e);
                None
            }
        }
    }
}
