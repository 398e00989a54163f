//! Reconnection delay policy.
//!
//! The default is a fixed delay with unbounded retries: every loss schedules
//! exactly one new attempt after `base_delay_ms`. The exponential variant
//! doubles the delay per consecutive failure up to a cap and adds jitter.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay growth strategy between reconnection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Same delay for every attempt.
    #[default]
    Fixed,
    /// base * 2^(attempt-1), capped, plus jitter.
    Exponential,
}

/// Reconnection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectPolicy {
    #[serde(default)]
    pub kind: BackoffKind,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for exponential growth (ignored for fixed).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Maximum random jitter added to exponential delays.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

fn default_base_delay_ms() -> u64 {
    5_000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_jitter_ms() -> u64 {
    1_000
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            kind: BackoffKind::Fixed,
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl ReconnectPolicy {
    /// Fixed delay policy.
    pub fn fixed(delay_ms: u64) -> Self {
        Self {
            kind: BackoffKind::Fixed,
            base_delay_ms: delay_ms,
            ..Self::default()
        }
    }

    /// Delay before reconnection attempt `attempt` (1-based count of
    /// consecutive failures).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.kind {
            BackoffKind::Fixed => Duration::from_millis(self.base_delay_ms),
            BackoffKind::Exponential => {
                // attempt=1 -> base, attempt=2 -> 2*base, attempt=3 -> 4*base
                let exponent = attempt.saturating_sub(1).min(10);
                let delay = self
                    .base_delay_ms
                    .saturating_mul(1u64 << exponent)
                    .min(self.max_delay_ms);
                Duration::from_millis(delay + rand_jitter(self.jitter_ms))
            }
        }
    }
}

/// Cheap jitter in `[0, bound)` from the clock's sub-second nanos.
fn rand_jitter(bound: u64) -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    if bound == 0 {
        return 0;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos) % bound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fixed_five_seconds() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.kind, BackoffKind::Fixed);
        assert_eq!(policy.delay_for(1), Duration::from_secs(5));
        // No growth, no ceiling on retries.
        assert_eq!(policy.delay_for(1_000), Duration::from_secs(5));
    }

    #[test]
    fn test_exponential_grows_and_caps() {
        let policy = ReconnectPolicy {
            kind: BackoffKind::Exponential,
            base_delay_ms: 100,
            max_delay_ms: 1_000,
            jitter_ms: 0,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(10), Duration::from_millis(1_000));
    }

    #[test]
    fn test_exponential_jitter_is_bounded() {
        let policy = ReconnectPolicy {
            kind: BackoffKind::Exponential,
            base_delay_ms: 100,
            max_delay_ms: 100,
            jitter_ms: 50,
        };
        let delay = policy.delay_for(4);
        assert!(delay >= Duration::from_millis(100));
        assert!(delay < Duration::from_millis(150));
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: ReconnectPolicy = serde_json::from_str(r#"{"kind":"exponential"}"#).unwrap();
        assert_eq!(policy.kind, BackoffKind::Exponential);
        assert_eq!(policy.base_delay_ms, 5_000);
    }
}
