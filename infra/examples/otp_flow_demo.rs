//! Demo of the full OTP flow against the mock SMS dispatcher.
//!
//! Run with: `cargo run --example otp_flow_demo -p otp_infra`

use std::sync::Arc;

use otp_core::services::otp::{OtpEngine, OtpEngineConfig, SlidingWindowRateLimiter};
use otp_core::{InMemoryVerificationStore, OtpPurpose, RateLimiterConfig};
use otp_infra::MockSmsDispatcher;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let store = Arc::new(InMemoryVerificationStore::new());
    let limiter = Arc::new(SlidingWindowRateLimiter::new(RateLimiterConfig::default()));
    let dispatcher = Arc::new(MockSmsDispatcher::new());
    let engine = OtpEngine::new(
        store,
        limiter,
        dispatcher.clone(),
        OtpEngineConfig::default(),
    );

    let phone = "+919876543210";

    println!("=== Generating OTP for {} ===", phone);
    let generated = engine
        .generate(phone, OtpPurpose::MobileVerification, Some("demo-user".to_string()))
        .await
        .expect("generate failed");
    println!(
        "verification_id: {}\nexpires_at: {}",
        generated.verification_id, generated.expires_at
    );

    println!("\n=== Verifying with a wrong code ===");
    match engine.verify(phone, "000000", generated.verification_id).await {
        Err(e) => println!("rejected as expected: {} (code {})", e, e.code()),
        Ok(_) => println!("unexpectedly accepted"),
    }

    println!("\n=== Verifying with the dispatched code ===");
    let code = dispatcher.last_code().expect("mock dispatcher captured the code");
    match engine.verify(phone, &code, generated.verification_id).await {
        Ok(success) => println!(
            "verified! purpose={}, user_id={:?}",
            success.purpose, success.user_id
        ),
        Err(e) => println!("verification failed: {}", e),
    }

    let status = engine
        .status(generated.verification_id)
        .await
        .expect("status lookup failed");
    println!(
        "\nfinal status: verified={} attempts={}/{}",
        status.verified, status.attempt_count, status.max_attempts
    );
}
