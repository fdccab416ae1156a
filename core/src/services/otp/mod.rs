//! OTP issuance-and-verification engine.
//!
//! This module provides the complete one-time-code workflow:
//! - code generation and issuance with rate limiting
//! - verification with attempt tracking and lazy expiry
//! - resend with cooldown enforcement and code rotation
//! - read-only status projection
//! - background sweeping of expired records
//!
//! The engine depends on a [`VerificationStore`](crate::repositories::VerificationStore),
//! a [`RateLimiter`] and a [`NotificationDispatcher`], all injected at
//! construction.

pub mod code_generator;
mod config;
mod cooldown;
mod engine;
mod key_locks;
mod rate_limiter;
mod sweeper;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::OtpEngineConfig;
pub use cooldown::ResendCooldownGuard;
pub use engine::OtpEngine;
pub use rate_limiter::{
    RateLimitDecision, RateLimiter, RateLimiterConfig, SlidingWindowRateLimiter,
};
pub use sweeper::{spawn_sweeper, SweeperConfig};
pub use traits::NotificationDispatcher;
pub use types::{GenerateResult, ResendResult, StatusSnapshot, VerifySuccess};
