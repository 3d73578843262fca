use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::ApiError;
use crate::core::backend::AgentBackend;
use crate::core::constants::SAFETY_TIMEOUT;
use crate::core::session::PendingQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    Completed {
        seq: u64,
        result: Result<String, ApiError>,
    },
    SafetyTimeout {
        seq: u64,
    },
}

impl QueryEvent {
    pub fn seq(&self) -> u64 {
        match self {
            QueryEvent::Completed { seq, .. } | QueryEvent::SafetyTimeout { seq } => *seq,
        }
    }
}

/// Runs submitted queries in the background.
///
/// Each submission gets two independent tasks: the backend call, and a
/// safety timer that releases the session if the call hangs. Neither cancels
/// the other; the session tells fresh events from stale ones by `seq`.
#[derive(Clone)]
pub struct QueryService {
    backend: Arc<dyn AgentBackend>,
    tx: mpsc::UnboundedSender<QueryEvent>,
    safety_timeout: Duration,
}

impl QueryService {
    pub fn new(backend: Arc<dyn AgentBackend>) -> (Self, mpsc::UnboundedReceiver<QueryEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                backend,
                tx,
                safety_timeout: SAFETY_TIMEOUT,
            },
            rx,
        )
    }

    pub fn spawn(&self, pending: PendingQuery) {
        let PendingQuery {
            seq,
            query,
            use_cache,
        } = pending;

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.query(&query, use_cache).await;
            debug!(seq, ok = result.is_ok(), "query finished");
            let _ = tx.send(QueryEvent::Completed { seq, result });
        });

        let tx = self.tx.clone();
        let safety_timeout = self.safety_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(safety_timeout).await;
            let _ = tx.send(QueryEvent::SafetyTimeout { seq });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CacheClearResponse, CacheStats, HealthResponse};
    use crate::core::backend::testing::ScriptedBackend;
    use crate::core::constants::QUERY_TIMEOUT;
    use crate::core::session::ChatSession;

    #[tokio::test(start_paused = true)]
    async fn completion_arrives_before_safety_timer() {
        let backend = Arc::new(ScriptedBackend::with_replies(vec![Ok("reply".into())]));
        let (service, mut rx) = QueryService::new(backend.clone());
        service.spawn(PendingQuery {
            seq: 1,
            query: "hello".into(),
            use_cache: true,
        });

        let first = rx.recv().await.unwrap();
        assert_eq!(
            first,
            QueryEvent::Completed {
                seq: 1,
                result: Ok("reply".into())
            }
        );
        // The safety timer still fires later; the session treats it as stale.
        let second = rx.recv().await.unwrap();
        assert_eq!(second, QueryEvent::SafetyTimeout { seq: 1 });
        assert_eq!(
            backend.queries_seen.lock().unwrap().as_slice(),
            &[("hello".to_string(), true)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn hung_request_releases_session_after_safety_timeout() {
        let backend = Arc::new(ScriptedBackend::default());
        let (service, mut rx) = QueryService::new(backend);
        let mut session = ChatSession::new(true);

        let started = tokio::time::Instant::now();
        let pending = session.submit("never answered").unwrap();
        service.spawn(pending);
        assert!(session.is_loading());

        let event = rx.recv().await.unwrap();
        assert_eq!(event, QueryEvent::SafetyTimeout { seq: 1 });
        assert!(started.elapsed() >= SAFETY_TIMEOUT);
        assert!(session.safety_timeout(event.seq()).is_some());
        assert!(!session.is_loading());
        assert_eq!(session.messages().len(), 2);
    }

    struct SlowTimeoutBackend;

    #[async_trait::async_trait]
    impl AgentBackend for SlowTimeoutBackend {
        async fn query(&self, _query: &str, _use_cache: bool) -> Result<String, ApiError> {
            tokio::time::sleep(QUERY_TIMEOUT + Duration::from_millis(1)).await;
            Err(ApiError::Timeout)
        }

        async fn health_check(&self) -> Result<HealthResponse, ApiError> {
            Err(ApiError::Timeout)
        }

        async fn cache_stats(&self) -> Result<CacheStats, ApiError> {
            Err(ApiError::Timeout)
        }

        async fn clear_cache(&self) -> Result<CacheClearResponse, ApiError> {
            Err(ApiError::Timeout)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn client_timeout_after_safety_timer_still_shows_diagnostic() {
        let (service, mut rx) = QueryService::new(Arc::new(SlowTimeoutBackend));
        let mut session = ChatSession::new(true);

        let pending = session.submit("a very long video").unwrap();
        service.spawn(pending);

        for _ in 0..2 {
            match rx.recv().await.unwrap() {
                QueryEvent::Completed { seq, result } => {
                    session.complete(seq, result);
                }
                QueryEvent::SafetyTimeout { seq } => {
                    session.safety_timeout(seq);
                }
            }
        }

        assert!(!session.is_loading());
        assert_eq!(session.messages().len(), 2);
        assert!(session.messages()[1].content.contains("Request timeout"));
        assert_eq!(
            session.last_error(),
            Some(ApiError::Timeout.to_string().as_str())
        );
    }
}
