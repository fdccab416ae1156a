//! Issuance rate limiting per identifier and purpose.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

use crate::domain::value_objects::OtpPurpose;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The request may proceed; it has been recorded against the window
    Allowed,
    /// The request must be rejected
    Denied {
        /// Suggested delay before retrying, in seconds (always >= 1)
        retry_after_seconds: i64,
    },
}

/// Caps how often codes may be generated for one `(identifier, purpose)`
/// pair. A denial always carries a retry delay; a legitimate request is
/// never silently dropped.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Checks and records one issuance request in a single atomic step.
    async fn check(&self, identifier: &str, purpose: OtpPurpose) -> RateLimitDecision;
}

/// Configuration for the sliding-window rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum generation requests per window
    pub max_requests: usize,
    /// Window length in seconds
    pub window_seconds: i64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_seconds: 900,
        }
    }
}

impl RateLimiterConfig {
    /// Builds the configuration from environment variables, falling back
    /// to defaults for anything unset or unparsable.
    ///
    /// * `OTP_RATE_LIMIT_MAX_REQUESTS`
    /// * `OTP_RATE_LIMIT_WINDOW_SECONDS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: read_env("OTP_RATE_LIMIT_MAX_REQUESTS", defaults.max_requests),
            window_seconds: read_env("OTP_RATE_LIMIT_WINDOW_SECONDS", defaults.window_seconds),
        }
    }
}

fn read_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Sliding-window limiter tracking request timestamps per key.
///
/// Checking and recording happen under one lock acquisition, so
/// concurrent requests for the same key cannot both slip under the cap.
pub struct SlidingWindowRateLimiter {
    config: RateLimiterConfig,
    windows: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl SlidingWindowRateLimiter {
    /// Creates a limiter with the given policy.
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn key(identifier: &str, purpose: OtpPurpose) -> String {
        format!("{}:{}", identifier, purpose)
    }

    #[cfg(test)]
    pub(crate) async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.len()
    }
}

impl Default for SlidingWindowRateLimiter {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowRateLimiter {
    async fn check(&self, identifier: &str, purpose: OtpPurpose) -> RateLimitDecision {
        let now = Utc::now();
        let window = Duration::seconds(self.config.window_seconds);
        let cutoff = now - window;

        let mut windows = self.windows.lock().await;

        // Evict keys whose newest request already left the window, so the
        // map does not grow with every identifier ever seen
        windows.retain(|_, entries| entries.back().is_some_and(|t| *t >= cutoff));

        let entries = windows.entry(Self::key(identifier, purpose)).or_default();

        while entries.front().is_some_and(|t| *t < cutoff) {
            entries.pop_front();
        }

        if entries.len() >= self.config.max_requests {
            // The slot frees up when the oldest tracked request ages out
            let retry_after_seconds = entries
                .front()
                .map(|oldest| (*oldest + window - now).num_seconds())
                .unwrap_or(self.config.window_seconds)
                .max(1);
            return RateLimitDecision::Denied {
                retry_after_seconds,
            };
        }

        entries.push_back(now);
        RateLimitDecision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn limiter(max_requests: usize, window_seconds: i64) -> SlidingWindowRateLimiter {
        SlidingWindowRateLimiter::new(RateLimiterConfig {
            max_requests,
            window_seconds,
        })
    }

    #[tokio::test]
    async fn test_allows_up_to_the_cap() {
        let limiter = limiter(3, 900);
        for _ in 0..3 {
            assert_eq!(
                limiter.check("+919876543210", OtpPurpose::MobileVerification).await,
                RateLimitDecision::Allowed
            );
        }
    }

    #[tokio::test]
    async fn test_denies_over_the_cap_with_retry_delay() {
        let limiter = limiter(2, 900);
        limiter.check("+919876543210", OtpPurpose::MobileVerification).await;
        limiter.check("+919876543210", OtpPurpose::MobileVerification).await;

        match limiter.check("+919876543210", OtpPurpose::MobileVerification).await {
            RateLimitDecision::Denied {
                retry_after_seconds,
            } => {
                assert!(retry_after_seconds >= 1);
                assert!(retry_after_seconds <= 900);
            }
            RateLimitDecision::Allowed => panic!("expected denial over the cap"),
        }
    }

    #[tokio::test]
    async fn test_keys_are_independent_per_identifier_and_purpose() {
        let limiter = limiter(1, 900);
        limiter.check("+919876543210", OtpPurpose::MobileVerification).await;

        // Different identifier, same purpose
        assert_eq!(
            limiter.check("+919876543211", OtpPurpose::MobileVerification).await,
            RateLimitDecision::Allowed
        );
        // Same identifier, different purpose
        assert_eq!(
            limiter.check("+919876543210", OtpPurpose::PasswordReset).await,
            RateLimitDecision::Allowed
        );
    }

    #[tokio::test]
    async fn test_window_slides_and_frees_slots() {
        let limiter = limiter(1, 1);
        assert_eq!(
            limiter.check("+919876543210", OtpPurpose::MobileVerification).await,
            RateLimitDecision::Allowed
        );
        assert!(matches!(
            limiter.check("+919876543210", OtpPurpose::MobileVerification).await,
            RateLimitDecision::Denied { .. }
        ));

        tokio::time::sleep(StdDuration::from_millis(1_100)).await;

        assert_eq!(
            limiter.check("+919876543210", OtpPurpose::MobileVerification).await,
            RateLimitDecision::Allowed
        );
    }

    #[tokio::test]
    async fn test_idle_keys_are_evicted_from_the_window_map() {
        let limiter = limiter(1, 1);
        for identifier in ["+919876543210", "+919876543211", "+919876543212"] {
            limiter.check(identifier, OtpPurpose::MobileVerification).await;
        }
        assert_eq!(limiter.tracked_keys().await, 3);

        tokio::time::sleep(StdDuration::from_millis(1_100)).await;

        // A later check for a fresh key drops every key that aged out
        limiter.check("+919876543213", OtpPurpose::MobileVerification).await;
        assert_eq!(limiter.tracked_keys().await, 1);
    }
}
