//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    spawn_sweeper, GenerateResult, NotificationDispatcher, OtpEngine, OtpEngineConfig,
    RateLimitDecision, RateLimiter, RateLimiterConfig, ResendCooldownGuard, ResendResult,
    SlidingWindowRateLimiter, StatusSnapshot, SweeperConfig, VerifySuccess,
};
