//! Notification dispatch implementations.

pub mod http;
pub mod mock;
pub mod template;

pub use http::{HttpDispatcherConfig, HttpNotificationDispatcher};
pub use mock::MockSmsDispatcher;
pub use template::{otp_settings, render_message, template_for, OtpSettings, RenderedMessage, SmsTemplate};
