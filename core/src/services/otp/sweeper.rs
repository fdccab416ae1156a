//! Background garbage collection of expired verification records.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::repositories::VerificationStore;

use super::engine::OtpEngine;
use super::rate_limiter::RateLimiter;
use super::traits::NotificationDispatcher;

/// Configuration for the periodic sweep task.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Seconds between sweep passes
    pub interval_seconds: u64,
    /// Whether the background task runs at all
    pub enabled: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            enabled: true,
        }
    }
}

impl SweeperConfig {
    /// Builds the configuration from environment variables, falling back
    /// to defaults for anything unset or unparsable.
    ///
    /// * `OTP_SWEEP_INTERVAL_SECONDS`
    /// * `OTP_SWEEP_ENABLED`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_seconds: std::env::var("OTP_SWEEP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.interval_seconds),
            enabled: std::env::var("OTP_SWEEP_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enabled),
        }
    }
}

/// Spawns the periodic sweep task for an engine.
///
/// The task runs on its own interval, fully decoupled from request
/// handling; each pass goes through [`OtpEngine::sweep_expired`], which
/// takes the same per-record locks as verify/resend. Returns `None` when
/// sweeping is disabled.
pub fn spawn_sweeper<S, L, D>(
    engine: Arc<OtpEngine<S, L, D>>,
    config: SweeperConfig,
) -> Option<JoinHandle<()>>
where
    S: VerificationStore + 'static,
    L: RateLimiter + 'static,
    D: NotificationDispatcher + 'static,
{
    if !config.enabled {
        warn!("OTP sweeper is disabled");
        return None;
    }

    let interval = Duration::from_secs(config.interval_seconds);
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so a fresh engine is
        // not swept before it has served anything
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = engine.sweep_expired().await {
                error!(error = %e, event = "otp_sweep_failed", "Sweep pass failed");
            }
        }
    }))
}
