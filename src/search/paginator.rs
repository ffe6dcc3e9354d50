use std::fmt;
use std::sync::Arc;

use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::models::UserRecord;
use crate::search::normalizer::{
    extract_continuation_flag, extract_continuation_token, extract_user_records,
};
use crate::search::pacer::Pacer;
use crate::search::transport::{PageRequest, SearchTransport};

/// Largest page the endpoint actually honors; asking for more returns no more.
pub const MAX_PAGE_SIZE: usize = 30;

/// Why a collection run ended. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TransportFailure,
    EmptyPage,
    LimitReached,
    NoContinuation,
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            StopReason::TransportFailure => "missing or invalid payload",
            StopReason::EmptyPage => "no users parsed from response",
            StopReason::LimitReached => "item limit reached",
            StopReason::NoContinuation => "no further pages",
            StopReason::Cancelled => "cancelled",
        };
        write!(f, "{}", reason)
    }
}

/// Records gathered for one query, in discovery order.
#[derive(Debug, Clone)]
pub struct Collection {
    pub records: Vec<UserRecord>,
    pub stop_reason: StopReason,
    pub pages_fetched: usize,
}

pub struct Paginator {
    transport: Arc<dyn SearchTransport>,
    pacer: Arc<dyn Pacer>,
    timeout: Duration,
    cancel: CancellationToken,
}

impl Paginator {
    pub fn new(
        transport: Arc<dyn SearchTransport>,
        pacer: Arc<dyn Pacer>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            pacer,
            timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned token so callers can stop collection between pages.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Collect up to `max_items` records for `query`, following continuation cursors.
    pub async fn collect(&self, query: &str, max_items: usize) -> Collection {
        let mut records: Vec<UserRecord> = Vec::new();
        let mut cursor: Option<i64> = Some(0);
        let mut pages_fetched = 0;
        let page_size = max_items.min(MAX_PAGE_SIZE);

        let stop_reason = loop {
            if records.len() >= max_items {
                break StopReason::LimitReached;
            }
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let request = PageRequest {
                query: query.to_string(),
                cursor,
                count: page_size,
                timeout: self.timeout,
            };

            let Some(payload) = self.transport.fetch_page(&request).await else {
                break StopReason::TransportFailure;
            };
            pages_fetched += 1;

            let users = extract_user_records(&payload);
            if users.is_empty() {
                break StopReason::EmptyPage;
            }

            let capacity = max_items - records.len();
            records.extend(users.into_iter().take(capacity));

            let has_more = extract_continuation_flag(&payload);
            cursor = extract_continuation_token(&payload);

            tracing::debug!(
                "Pagination state for '{}': collected={}, has_more={}, next_cursor={:?}",
                query,
                records.len(),
                has_more,
                cursor
            );

            if records.len() >= max_items {
                break StopReason::LimitReached;
            }
            if !has_more || cursor.is_none() {
                break StopReason::NoContinuation;
            }

            self.pacer.pause().await;
        };

        tracing::info!(
            "Finished search for '{}': collected {} user records ({})",
            query,
            records.len(),
            stop_reason
        );

        Collection {
            records,
            stop_reason,
            pages_fetched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedTransport {
        pages: Mutex<VecDeque<Option<Value>>>,
        requests: Mutex<Vec<PageRequest>>,
    }

    impl ScriptedTransport {
        fn new(pages: Vec<Option<Value>>) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<PageRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchTransport for ScriptedTransport {
        async fn fetch_page(&self, request: &PageRequest) -> Option<Value> {
            self.requests.lock().unwrap().push(request.clone());
            self.pages.lock().unwrap().pop_front().flatten()
        }
    }

    #[derive(Default)]
    struct CountingPacer {
        pauses: AtomicUsize,
    }

    #[async_trait]
    impl Pacer for CountingPacer {
        async fn pause(&self) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn page(uids: std::ops::Range<usize>, has_more: bool, cursor: Option<i64>) -> Option<Value> {
        let users: Vec<Value> = uids
            .map(|i| json!({"user_info": {"uid": i.to_string(), "unique_id": format!("user{}", i)}}))
            .collect();
        let mut data = json!({"user_list": users, "has_more": has_more});
        if let Some(cursor) = cursor {
            data["cursor"] = json!(cursor);
        }
        Some(json!({"status_code": 0, "data": data}))
    }

    fn paginator(transport: Arc<ScriptedTransport>, pacer: Arc<CountingPacer>) -> Paginator {
        Paginator::new(transport, pacer, Duration::from_secs(10))
    }

    fn uids(collection: &Collection) -> Vec<String> {
        collection
            .records
            .iter()
            .map(|r| r.id.as_ref().map(ToString::to_string).unwrap_or_default())
            .collect()
    }

    #[tokio::test]
    async fn test_two_pages_until_continuation_ends() {
        let transport = ScriptedTransport::new(vec![
            page(0..3, true, Some(3)),
            page(3..5, false, None),
        ]);
        let pacer = Arc::new(CountingPacer::default());

        let collection = paginator(transport.clone(), pacer.clone())
            .collect("cats", 5)
            .await;

        assert_eq!(uids(&collection), vec!["0", "1", "2", "3", "4"]);
        assert_eq!(collection.stop_reason, StopReason::LimitReached);
        assert_eq!(collection.pages_fetched, 2);
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 1);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].cursor, Some(0));
        assert_eq!(requests[0].count, 5);
        assert_eq!(requests[1].cursor, Some(3));
        assert!(requests.iter().all(|r| r.query == "cats"));
    }

    #[tokio::test]
    async fn test_transport_failure_on_first_page() {
        let transport = ScriptedTransport::new(vec![None]);
        let pacer = Arc::new(CountingPacer::default());

        let collection = paginator(transport.clone(), pacer.clone())
            .collect("cats", 10)
            .await;

        assert!(collection.records.is_empty());
        assert_eq!(collection.stop_reason, StopReason::TransportFailure);
        assert_eq!(collection.pages_fetched, 0);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_collected_records() {
        let transport = ScriptedTransport::new(vec![page(0..3, true, Some(3)), None]);
        let pacer = Arc::new(CountingPacer::default());

        let collection = paginator(transport.clone(), pacer.clone())
            .collect("cats", 10)
            .await;

        assert_eq!(collection.records.len(), 3);
        assert_eq!(collection.stop_reason, StopReason::TransportFailure);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_page_size_capped_at_thirty() {
        let transport = ScriptedTransport::new(vec![
            page(0..30, true, Some(30)),
            page(30..60, true, Some(60)),
            page(60..90, true, Some(90)),
            page(90..120, true, Some(120)),
        ]);
        let pacer = Arc::new(CountingPacer::default());

        let collection = paginator(transport.clone(), pacer.clone())
            .collect("cats", 100)
            .await;

        assert_eq!(collection.records.len(), 100);
        assert_eq!(collection.stop_reason, StopReason::LimitReached);
        assert!(transport.requests().iter().all(|r| r.count == MAX_PAGE_SIZE));
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 3);
        assert_eq!(uids(&collection)[99], "99");
    }

    #[tokio::test]
    async fn test_overflow_within_page_is_discarded() {
        let transport = ScriptedTransport::new(vec![page(0..10, true, Some(10))]);
        let pacer = Arc::new(CountingPacer::default());

        let collection = paginator(transport.clone(), pacer.clone())
            .collect("cats", 4)
            .await;

        assert_eq!(uids(&collection), vec!["0", "1", "2", "3"]);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_page_is_distinct_from_failure() {
        let transport = ScriptedTransport::new(vec![Some(json!({"data": {"user_list": []}}))]);
        let pacer = Arc::new(CountingPacer::default());

        let collection = paginator(transport, pacer).collect("cats", 10).await;

        assert!(collection.records.is_empty());
        assert_eq!(collection.stop_reason, StopReason::EmptyPage);
        assert_eq!(collection.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_missing_cursor_stops_without_pacing() {
        let transport = ScriptedTransport::new(vec![page(0..3, true, None)]);
        let pacer = Arc::new(CountingPacer::default());

        let collection = paginator(transport.clone(), pacer.clone())
            .collect("cats", 10)
            .await;

        assert_eq!(collection.records.len(), 3);
        assert_eq!(collection.stop_reason, StopReason::NoContinuation);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_false_flag_stops_even_with_cursor() {
        let transport = ScriptedTransport::new(vec![page(0..3, false, Some(3))]);
        let pacer = Arc::new(CountingPacer::default());

        let collection = paginator(transport.clone(), pacer.clone())
            .collect("cats", 10)
            .await;

        assert_eq!(collection.stop_reason, StopReason::NoContinuation);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_requests() {
        let transport = ScriptedTransport::new(vec![page(0..3, true, Some(3))]);
        let pacer = Arc::new(CountingPacer::default());

        let collection = paginator(transport.clone(), pacer).collect("cats", 0).await;

        assert!(collection.records.is_empty());
        assert_eq!(collection.stop_reason, StopReason::LimitReached);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_first_request() {
        let transport = ScriptedTransport::new(vec![page(0..3, true, Some(3))]);
        let pacer = Arc::new(CountingPacer::default());
        let token = CancellationToken::new();
        token.cancel();

        let collection = paginator(transport.clone(), pacer)
            .with_cancellation(token)
            .collect("cats", 10)
            .await;

        assert_eq!(collection.stop_reason, StopReason::Cancelled);
        assert!(transport.requests().is_empty());
    }

    struct CancellingPacer {
        token: CancellationToken,
    }

    #[async_trait]
    impl Pacer for CancellingPacer {
        async fn pause(&self) {
            self.token.cancel();
        }
    }

    #[tokio::test]
    async fn test_cancelled_between_pages_keeps_first_page() {
        let transport = ScriptedTransport::new(vec![
            page(0..3, true, Some(3)),
            page(3..6, true, Some(6)),
        ]);
        let token = CancellationToken::new();
        let pacer = Arc::new(CancellingPacer {
            token: token.clone(),
        });

        let paginator = Paginator::new(transport.clone(), pacer, Duration::from_secs(10))
            .with_cancellation(token);
        let collection = paginator.collect("cats", 10).await;

        assert_eq!(collection.records.len(), 3);
        assert_eq!(collection.stop_reason, StopReason::Cancelled);
        assert_eq!(transport.requests().len(), 1);
        assert!(paginator.cancellation_token().is_cancelled());
    }
}
