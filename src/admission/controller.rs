//! Admission gate in front of discovery and forwarding.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time;

use crate::admission::store::QuotaStore;
use crate::admission::window::{Admission, QuotaPolicy};
use crate::config::QuotaConfig;
use crate::observability::metrics;

/// Per-client fixed-window quota.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    store: Arc<dyn QuotaStore>,
    policy: QuotaPolicy,
    enabled: bool,
}

impl AdmissionController {
    pub fn new(store: Arc<dyn QuotaStore>, policy: QuotaPolicy) -> Self {
        Self {
            store,
            policy,
            enabled: true,
        }
    }

    pub fn from_config(store: Arc<dyn QuotaStore>, config: &QuotaConfig) -> Self {
        Self {
            store,
            policy: QuotaPolicy::new(config.limit, config.window()),
            enabled: config.enabled,
        }
    }

    /// Admits every request without touching the store.
    pub fn disabled(store: Arc<dyn QuotaStore>) -> Self {
        Self {
            store,
            policy: QuotaPolicy::new(u32::MAX, Duration::MAX),
            enabled: false,
        }
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    pub fn try_consume(&self, identity: &str) -> Admission {
        self.try_consume_at(identity, Instant::now())
    }

    pub fn try_consume_at(&self, identity: &str, now: Instant) -> Admission {
        if !self.enabled {
            return Admission::Accepted {
                remaining: self.policy.limit,
            };
        }

        let admission = self.store.consume(identity, &self.policy, now);
        if let Admission::Rejected { retry_after } = admission {
            tracing::warn!(client = %identity, retry_after = ?retry_after, "Quota exceeded");
            metrics::record_quota_rejection();
        }
        admission
    }

    /// Periodically drop expired windows until shutdown.
    pub async fn run_sweeper(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.enabled {
            return;
        }

        let mut ticker = time::interval(self.policy.window);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.store.purge_expired(&self.policy, Instant::now());
                    if removed > 0 {
                        tracing::debug!(removed, tracked = self.store.len(), "Purged expired quota windows");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Quota sweeper stopping");
                    break;
                }
            }
        }
    }
}
