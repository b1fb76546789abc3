//! Quota state storage.

use std::time::Instant;

use dashmap::DashMap;

use crate::admission::window::{Admission, QuotaPolicy, QuotaState};

/// Owner of the per-identity counters.
///
/// `consume` must perform its read-increment-write atomically per identity:
/// concurrent callers for the same key may not both observe the last slot.
pub trait QuotaStore: Send + Sync + std::fmt::Debug {
    fn consume(&self, identity: &str, policy: &QuotaPolicy, now: Instant) -> Admission;

    /// Drop counters whose window has elapsed. Returns how many were removed.
    fn purge_expired(&self, policy: &QuotaPolicy, now: Instant) -> usize;

    /// Number of identities currently tracked.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store. State is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryQuotaStore {
    windows: DashMap<String, QuotaState>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuotaStore for InMemoryQuotaStore {
    fn consume(&self, identity: &str, policy: &QuotaPolicy, now: Instant) -> Admission {
        // The entry guard holds the shard write lock until it is dropped.
        let mut state = self
            .windows
            .entry(identity.to_string())
            .or_insert_with(|| QuotaState::new(now));
        state.try_consume(policy, now)
    }

    fn purge_expired(&self, policy: &QuotaPolicy, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, state| !state.is_expired(policy, now));
        before.saturating_sub(self.windows.len())
    }

    fn len(&self) -> usize {
        self.windows.len()
    }
}
