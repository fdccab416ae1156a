//! Configuration for the OTP engine.

use chrono::Duration;

use crate::domain::entities::{
    DEFAULT_CODE_TTL_SECONDS, DEFAULT_RESEND_COOLDOWN_SECONDS, MAX_ATTEMPTS,
};

/// Tunables for the OTP engine.
#[derive(Debug, Clone)]
pub struct OtpEngineConfig {
    /// Validity window for a code, in seconds
    pub code_ttl_seconds: i64,
    /// Verification attempts allowed before the record is purged
    pub max_attempts: u32,
    /// Minimum interval between resend operations, in seconds
    pub resend_cooldown_seconds: i64,
    /// Upper bound on a single notification dispatch call, in milliseconds
    pub dispatch_timeout_ms: u64,
}

impl Default for OtpEngineConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: DEFAULT_CODE_TTL_SECONDS,
            max_attempts: MAX_ATTEMPTS,
            resend_cooldown_seconds: DEFAULT_RESEND_COOLDOWN_SECONDS,
            dispatch_timeout_ms: 5_000,
        }
    }
}

impl OtpEngineConfig {
    /// Builds the configuration from environment variables, falling back
    /// to defaults for anything unset or unparsable.
    ///
    /// * `OTP_CODE_TTL_SECONDS`
    /// * `OTP_MAX_ATTEMPTS`
    /// * `OTP_RESEND_COOLDOWN_SECONDS`
    /// * `OTP_DISPATCH_TIMEOUT_MS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_ttl_seconds: read_env("OTP_CODE_TTL_SECONDS", defaults.code_ttl_seconds),
            max_attempts: read_env("OTP_MAX_ATTEMPTS", defaults.max_attempts),
            resend_cooldown_seconds: read_env(
                "OTP_RESEND_COOLDOWN_SECONDS",
                defaults.resend_cooldown_seconds,
            ),
            dispatch_timeout_ms: read_env("OTP_DISPATCH_TIMEOUT_MS", defaults.dispatch_timeout_ms),
        }
    }

    /// Code validity window as a `chrono` duration.
    pub fn code_ttl(&self) -> Duration {
        Duration::seconds(self.code_ttl_seconds)
    }
}

fn read_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
