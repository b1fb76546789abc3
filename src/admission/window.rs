//! Fixed-window counter.

use std::time::{Duration, Instant};

/// Limit and window length shared by every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    pub limit: u32,
    pub window: Duration,
}

impl QuotaPolicy {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }
}

/// Verdict for one unit of quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted { remaining: u32 },
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted { .. })
    }
}

/// Counter for one client identity.
///
/// The window opens on the first request and resets once `policy.window`
/// has elapsed since it opened.
#[derive(Debug, Clone, Copy)]
pub struct QuotaState {
    window_start: Instant,
    count: u32,
}

impl QuotaState {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_expired(&self, policy: &QuotaPolicy, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) >= policy.window
    }

    /// Consume one unit. `count` never exceeds `policy.limit`.
    pub fn try_consume(&mut self, policy: &QuotaPolicy, now: Instant) -> Admission {
        if self.is_expired(policy, now) {
            self.window_start = now;
            self.count = 0;
        }

        if self.count < policy.limit {
            self.count += 1;
            Admission::Accepted {
                remaining: policy.limit - self.count,
            }
        } else {
            let elapsed = now.saturating_duration_since(self.window_start);
            Admission::Rejected {
                retry_after: policy.window.saturating_sub(elapsed),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> QuotaPolicy {
        QuotaPolicy::new(3, Duration::from_secs(60))
    }

    #[test]
    fn test_admits_up_to_limit() {
        let now = Instant::now();
        let mut state = QuotaState::new(now);

        assert_eq!(state.try_consume(&policy(), now), Admission::Accepted { remaining: 2 });
        assert_eq!(state.try_consume(&policy(), now), Admission::Accepted { remaining: 1 });
        assert_eq!(state.try_consume(&policy(), now), Admission::Accepted { remaining: 0 });
        assert!(!state.try_consume(&policy(), now).is_accepted());
        assert_eq!(state.count(), 3);
    }

    #[test]
    fn test_retry_after_counts_down() {
        let start = Instant::now();
        let mut state = QuotaState::new(start);
        for _ in 0..3 {
            state.try_consume(&policy(), start);
        }

        let later = start + Duration::from_secs(45);
        assert_eq!(
            state.try_consume(&policy(), later),
            Admission::Rejected {
                retry_after: Duration::from_secs(15)
            }
        );
    }

    #[test]
    fn test_resets_when_window_elapses() {
        let start = Instant::now();
        let mut state = QuotaState::new(start);
        for _ in 0..3 {
            state.try_consume(&policy(), start);
        }

        let next_window = start + Duration::from_secs(60);
        assert!(state.is_expired(&policy(), next_window));
        assert_eq!(
            state.try_consume(&policy(), next_window),
            Admission::Accepted { remaining: 2 }
        );
        assert_eq!(state.count(), 1);
    }

    #[test]
    fn test_rejections_do_not_extend_window() {
        let start = Instant::now();
        let mut state = QuotaState::new(start);
        for i in 0..10 {
            state.try_consume(&policy(), start + Duration::from_secs(i));
        }
        assert_eq!(state.count(), 3);
        assert!(state
            .try_consume(&policy(), start + Duration::from_secs(60))
            .is_accepted());
    }
}
