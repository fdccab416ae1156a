//! Collaborator contract for notification delivery.

use async_trait::async_trait;

use crate::domain::value_objects::OtpPurpose;
use crate::errors::DispatchError;

/// Delivers a generated code to the user through an external channel.
///
/// The engine is agnostic to the channel and message content: resolving a
/// template for the purpose, substituting the code, and talking to the
/// provider are entirely the dispatcher's responsibility. The engine
/// wraps every call in a bounded timeout and never invokes the
/// dispatcher while holding a per-record lock.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Sends the code to the identifier's channel.
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the dispatched message
    /// * `Err(DispatchError)` - If rendering or delivery fails
    async fn send(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
        code: &str,
    ) -> Result<String, DispatchError>;

    /// Name of the delivery channel, for logs ("sms", "mock", ...).
    fn channel_name(&self) -> &str;
}
