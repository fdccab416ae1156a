//! # FreedmAI OTP Infrastructure
//!
//! Concrete notification dispatchers for the OTP engine: a mock SMS
//! dispatcher for development and testing, and an HTTP dispatcher that
//! forwards rendered messages to the standalone notification service.
//! Also carries the SMS template registry and phone-number helpers used
//! at the delivery edge.

pub mod notification;
pub mod phone;

// Re-export commonly used types
pub use notification::{
    otp_settings, render_message, template_for, HttpDispatcherConfig, HttpNotificationDispatcher,
    MockSmsDispatcher, OtpSettings, RenderedMessage, SmsTemplate,
};
pub use phone::{is_valid_e164, is_valid_indian_mobile};
