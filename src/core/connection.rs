//! Backend reachability as shown in the connection banner.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{ApiError, HealthResponse};
use crate::core::backend::AgentBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Checking,
    Connected { service: String },
    Disconnected { reason: String },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }

    pub fn banner(&self) -> &'static str {
        match self {
            ConnectionStatus::Checking => "Checking connection...",
            ConnectionStatus::Connected { .. } => "Connected to backend API",
            ConnectionStatus::Disconnected { .. } => "Unable to connect to the API server",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ConnectionStatus::Disconnected { .. } => Some("Press Ctrl+R or type /retry to try again"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    Started,
    Finished(Result<HealthResponse, ApiError>),
}

#[derive(Debug)]
pub struct ConnectionMonitor {
    status: ConnectionStatus,
    checks: u64,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Checking,
            checks: 0,
        }
    }
}

impl ConnectionMonitor {
    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    /// Number of finished health checks.
    pub fn checks(&self) -> u64 {
        self.checks
    }

    pub fn begin_check(&mut self) {
        self.status = ConnectionStatus::Checking;
    }

    pub fn record(&mut self, result: Result<HealthResponse, ApiError>) {
        self.checks += 1;
        self.status = match result {
            Ok(health) => ConnectionStatus::Connected {
                service: health.service,
            },
            Err(err) => ConnectionStatus::Disconnected {
                reason: err.to_string(),
            },
        };
        debug!(status = ?self.status, "health check recorded");
    }

    pub fn apply(&mut self, event: HealthEvent) {
        match event {
            HealthEvent::Started => self.begin_check(),
            HealthEvent::Finished(result) => self.record(result),
        }
    }
}

/// Background task that checks `/health` on start, then on every interval
/// tick or manual retry, whichever comes first. Dropping it stops the task.
pub struct HealthPoller {
    retry: Arc<Notify>,
    cancel: CancellationToken,
}

impl HealthPoller {
    pub fn spawn(
        backend: Arc<dyn AgentBackend>,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<HealthEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let retry = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let task_retry = Arc::clone(&retry);
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                if tx.send(HealthEvent::Started).is_err() {
                    break;
                }
                let result = tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    result = backend.health_check() => result,
                };
                if tx.send(HealthEvent::Finished(result)).is_err() {
                    break;
                }
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                    _ = task_retry.notified() => debug!("manual health retry"),
                }
            }
        });

        (Self { retry, cancel }, rx)
    }

    /// Runs the next check now instead of waiting for the interval.
    pub fn retry_now(&self) {
        self.retry.notify_one();
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
