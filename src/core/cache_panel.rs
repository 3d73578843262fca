use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{ApiError, CacheStats};
use crate::core::backend::AgentBackend;

/// Sidebar state for the backend's answer cache. Failures never reach the
/// user here: a failed refresh just leaves "No cache data available".
#[derive(Debug, Default)]
pub struct CachePanel {
    open: bool,
    loading: bool,
    stats: Option<CacheStats>,
    last_message: Option<String>,
}

impl CachePanel {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn stats(&self) -> Option<&CacheStats> {
        self.stats.as_ref()
    }

    /// Confirmation text from the last successful clear.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Flips visibility. Returns true when the panel just opened, in which
    /// case the caller should refresh.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    pub fn finish_refresh(&mut self, result: Result<CacheStats, ApiError>) {
        self.loading = false;
        self.stats = match result {
            Ok(stats) => Some(stats),
            Err(err) => {
                debug!(error = %err, "cache stats unavailable");
                None
            }
        };
    }

    pub fn record_clear(&mut self, result: Result<String, ApiError>) {
        match result {
            Ok(message) => self.last_message = Some(message),
            Err(err) => debug!(error = %err, "cache clear failed"),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        if self.loading && self.stats.is_none() {
            return vec!["Loading...".to_string()];
        }
        match &self.stats {
            Some(stats) => stats.summary_lines(),
            None => vec!["No cache data available".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Stats(Result<CacheStats, ApiError>),
    Cleared(Result<String, ApiError>),
}

/// Runs cache requests off the event loop.
#[derive(Clone)]
pub struct CacheService {
    backend: Arc<dyn AgentBackend>,
    tx: mpsc::UnboundedSender<CacheEvent>,
}

impl CacheService {
    pub fn new(backend: Arc<dyn AgentBackend>) -> (Self, mpsc::UnboundedReceiver<CacheEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { backend, tx }, rx)
    }

    pub fn refresh(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.cache_stats().await;
            let _ = tx.send(CacheEvent::Stats(result));
        });
    }

    /// Clears the cache, then reports fresh stats whether or not the clear
    /// succeeded.
    pub fn clear(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let cleared = backend.clear_cache().await.map(|resp| resp.message);
            let _ = tx.send(CacheEvent::Cleared(cleared));
            let stats = backend.cache_stats().await;
            let _ = tx.send(CacheEvent::Stats(stats));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CacheClearResponse;
    use crate::core::backend::testing::ScriptedBackend;

    fn stats(hits: u64, misses: u64, size: u64) -> CacheStats {
        CacheStats {
            hits,
            misses,
            size,
            ..Default::default()
        }
    }

    #[test]
    fn toggle_reports_opening() {
        let mut panel = CachePanel::default();
        assert!(panel.toggle());
        assert!(panel.is_open());
        assert!(!panel.toggle());
        assert!(!panel.is_open());
    }

    #[test]
    fn lines_follow_loading_and_stats() {
        let mut panel = CachePanel::default();
        assert_eq!(panel.lines(), vec!["No cache data available"]);

        panel.begin_refresh();
        assert_eq!(panel.lines(), vec!["Loading..."]);

        panel.finish_refresh(Ok(stats(3, 1, 2)));
        assert!(!panel.is_loading());
        assert_eq!(
            panel.lines(),
            vec!["Hits: 3", "Misses: 1", "Size: 2", "Hit rate: 75.0%"]
        );
    }

    #[test]
    fn failed_refresh_clears_stats_silently() {
        let mut panel = CachePanel::default();
        panel.finish_refresh(Ok(stats(1, 1, 1)));
        panel.begin_refresh();
        panel.finish_refresh(Err(ApiError::Timeout));
        assert!(panel.stats().is_none());
        assert_eq!(panel.lines(), vec!["No cache data available"]);
    }

    #[test]
    fn clear_failure_is_swallowed() {
        let mut panel = CachePanel::default();
        panel.record_clear(Err(ApiError::Timeout));
        assert!(panel.last_message().is_none());
        panel.record_clear(Ok("Cache cleared successfully".into()));
        assert_eq!(panel.last_message(), Some("Cache cleared successfully"));
    }

    #[tokio::test]
    async fn clear_then_refreshes() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_clear(Ok(CacheClearResponse {
            message: "Cache cleared successfully".into(),
        }));
        backend.push_stats(Ok(stats(0, 0, 0)));
        let (service, mut rx) = CacheService::new(backend);

        service.clear();
        assert_eq!(
            rx.recv().await.unwrap(),
            CacheEvent::Cleared(Ok("Cache cleared successfully".into()))
        );
        assert_eq!(rx.recv().await.unwrap(), CacheEvent::Stats(Ok(stats(0, 0, 0))));
    }

    #[tokio::test]
    async fn refresh_reports_failure_as_event() {
        let backend = Arc::new(ScriptedBackend::default());
        let (service, mut rx) = CacheService::new(backend);
        service.refresh();
        assert!(matches!(
            rx.recv().await.unwrap(),
            CacheEvent::Stats(Err(ApiError::Unreachable { .. }))
        ));
    }
}
