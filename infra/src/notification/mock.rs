//! Mock SMS dispatcher.
//!
//! Logs rendered messages instead of delivering them. Used in
//! development and tests; the captured last code lets dev tooling drive
//! a full generate/verify round trip without a real channel.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use otp_core::domain::entities::DEFAULT_CODE_TTL_SECONDS;
use otp_core::domain::value_objects::OtpPurpose;
use otp_core::errors::DispatchError;
use otp_core::services::otp::NotificationDispatcher;
use otp_core::utils::mask_identifier;

use crate::phone::{is_valid_e164, is_valid_indian_mobile};

use super::template::render_message;

/// Dispatcher that prints messages to the console.
#[derive(Debug, Default)]
pub struct MockSmsDispatcher {
    message_count: AtomicU64,
    last_code: Mutex<Option<String>>,
    simulate_failure: bool,
    console_output: bool,
}

impl MockSmsDispatcher {
    /// Creates a mock dispatcher with console output enabled.
    pub fn new() -> Self {
        Self {
            message_count: AtomicU64::new(0),
            last_code: Mutex::new(None),
            simulate_failure: false,
            console_output: true,
        }
    }

    /// Creates a mock with configurable options.
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: AtomicU64::new(0),
            last_code: Mutex::new(None),
            simulate_failure,
            console_output,
        }
    }

    /// Total number of messages dispatched.
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// The code carried by the most recent dispatch.
    pub fn last_code(&self) -> Option<String> {
        self.last_code.lock().expect("last_code mutex poisoned").clone()
    }

    fn is_deliverable(identifier: &str, purpose: OtpPurpose) -> bool {
        match purpose {
            OtpPurpose::MobileVerification => is_valid_indian_mobile(identifier),
            // Password reset codes go to whatever phone is on file
            OtpPurpose::PasswordReset => is_valid_e164(identifier),
            OtpPurpose::EmailVerification => {
                matches!(identifier.split_once('@'), Some((local, domain))
                    if !local.is_empty() && domain.contains('.'))
            }
        }
    }
}

#[async_trait]
impl NotificationDispatcher for MockSmsDispatcher {
    async fn send(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
        code: &str,
    ) -> Result<String, DispatchError> {
        if !Self::is_deliverable(identifier, purpose) {
            return Err(DispatchError::InvalidDestination);
        }

        if self.simulate_failure {
            warn!(
                identifier = %mask_identifier(identifier),
                "Mock dispatcher simulating delivery failure"
            );
            return Err(DispatchError::Channel("simulated delivery failure".to_string()));
        }

        let rendered = render_message(purpose, code, DEFAULT_CODE_TTL_SECONDS / 60)?;
        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_code.lock().expect("last_code mutex poisoned") = Some(code.to_string());

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("📱 MOCK SMS DISPATCHER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", identifier);
            println!("From: {}", rendered.sender_id);
            println!("Message ID: {}", message_id);
            println!("Content: {}", rendered.message);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "notification",
            channel = "mock",
            identifier = %mask_identifier(identifier),
            purpose = %purpose,
            message_id = %message_id,
            "Dispatched mock SMS"
        );

        Ok(message_id)
    }

    fn channel_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_returns_message_id_and_counts() {
        let dispatcher = MockSmsDispatcher::with_options(false, false);

        let id = dispatcher
            .send("+919876543210", OtpPurpose::MobileVerification, "123456")
            .await
            .unwrap();

        assert!(id.starts_with("mock_"));
        assert_eq!(dispatcher.message_count(), 1);
        assert_eq!(dispatcher.last_code().as_deref(), Some("123456"));
    }

    #[tokio::test]
    async fn test_rejects_undeliverable_identifiers() {
        let dispatcher = MockSmsDispatcher::with_options(false, false);

        let err = dispatcher
            .send("9876543210", OtpPurpose::MobileVerification, "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidDestination));

        let err = dispatcher
            .send("not-an-email", OtpPurpose::EmailVerification, "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidDestination));

        assert_eq!(dispatcher.message_count(), 0);
    }

    #[tokio::test]
    async fn test_email_purpose_accepts_addresses() {
        let dispatcher = MockSmsDispatcher::with_options(false, false);

        dispatcher
            .send("alice@example.com", OtpPurpose::EmailVerification, "654321")
            .await
            .unwrap();
        assert_eq!(dispatcher.message_count(), 1);
    }

    #[tokio::test]
    async fn test_simulated_failure_surfaces_as_channel_error() {
        let dispatcher = MockSmsDispatcher::with_options(false, true);

        let err = dispatcher
            .send("+919876543210", OtpPurpose::MobileVerification, "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Channel(_)));
        assert_eq!(dispatcher.message_count(), 0);
    }
}
