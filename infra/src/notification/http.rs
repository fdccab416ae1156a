//! HTTP dispatcher posting to the standalone notification service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use otp_core::domain::entities::DEFAULT_CODE_TTL_SECONDS;
use otp_core::domain::value_objects::OtpPurpose;
use otp_core::errors::DispatchError;
use otp_core::services::otp::NotificationDispatcher;
use otp_core::utils::mask_identifier;

use crate::phone::is_valid_e164;

/// Configuration for the HTTP dispatcher.
#[derive(Debug, Clone)]
pub struct HttpDispatcherConfig {
    /// Base URL of the notification service
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for HttpDispatcherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3006".to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

impl HttpDispatcherConfig {
    /// Builds the configuration from environment variables, falling back
    /// to defaults for anything unset or unparsable.
    ///
    /// * `NOTIFICATION_SERVICE_URL`
    /// * `NOTIFICATION_REQUEST_TIMEOUT_MS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("NOTIFICATION_SERVICE_URL").unwrap_or(defaults.base_url),
            request_timeout_ms: std::env::var("NOTIFICATION_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
        }
    }
}

/// Request payload for the notification service's SMS endpoint.
#[derive(Debug, Serialize)]
struct SendSmsRequest<'a> {
    mobile_number: &'a str,
    template_type: &'a str,
    variables: SmsVariables<'a>,
}

#[derive(Debug, Serialize)]
struct SmsVariables<'a> {
    #[serde(rename = "OTP_CODE")]
    otp_code: &'a str,
    #[serde(rename = "EXPIRY_MINUTES")]
    expiry_minutes: String,
}

#[derive(Debug, Deserialize)]
struct SendSmsResponse {
    #[serde(default)]
    data: Option<SendSmsData>,
}

#[derive(Debug, Deserialize)]
struct SendSmsData {
    #[serde(default)]
    message_id: Option<String>,
}

/// Dispatcher delivering through the notification service's
/// `POST /notifications/sms/send` endpoint.
pub struct HttpNotificationDispatcher {
    client: reqwest::Client,
    config: HttpDispatcherConfig,
}

impl HttpNotificationDispatcher {
    /// Creates a dispatcher with a request-level timeout baked into the
    /// client. The engine applies its own outer timeout as well.
    pub fn new(config: HttpDispatcherConfig) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| DispatchError::Channel(format!("failed to build http client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/notifications/sms/send", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NotificationDispatcher for HttpNotificationDispatcher {
    async fn send(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
        code: &str,
    ) -> Result<String, DispatchError> {
        // Email delivery is not routed over the SMS endpoint
        if purpose != OtpPurpose::EmailVerification && !is_valid_e164(identifier) {
            return Err(DispatchError::InvalidDestination);
        }

        let payload = SendSmsRequest {
            mobile_number: identifier,
            template_type: purpose.as_str(),
            variables: SmsVariables {
                otp_code: code,
                expiry_minutes: (DEFAULT_CODE_TTL_SECONDS / 60).to_string(),
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| DispatchError::Channel(format!("notification service unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Channel(format!(
                "notification service returned {}",
                status
            )));
        }

        // The service echoes a provider message id; fall back to a local
        // one if the body shape ever changes
        let message_id = response
            .json::<SendSmsResponse>()
            .await
            .ok()
            .and_then(|body| body.data.and_then(|d| d.message_id))
            .unwrap_or_else(|| format!("sms_{}", Uuid::new_v4()));

        info!(
            target: "notification",
            channel = "sms",
            identifier = %mask_identifier(identifier),
            purpose = %purpose,
            message_id = %message_id,
            "Dispatched SMS via notification service"
        );

        Ok(message_id)
    }

    fn channel_name(&self) -> &str {
        "sms"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_matches_notification_service_contract() {
        let payload = SendSmsRequest {
            mobile_number: "+919876543210",
            template_type: OtpPurpose::MobileVerification.as_str(),
            variables: SmsVariables {
                otp_code: "123456",
                expiry_minutes: "5".to_string(),
            },
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["mobile_number"], "+919876543210");
        assert_eq!(json["template_type"], "mobile_verification");
        assert_eq!(json["variables"]["OTP_CODE"], "123456");
        assert_eq!(json["variables"]["EXPIRY_MINUTES"], "5");
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let dispatcher = HttpNotificationDispatcher::new(HttpDispatcherConfig {
            base_url: "http://localhost:3006/".to_string(),
            request_timeout_ms: 1_000,
        })
        .unwrap();

        assert_eq!(
            dispatcher.endpoint(),
            "http://localhost:3006/notifications/sms/send"
        );
    }

    #[tokio::test]
    async fn test_invalid_destination_is_rejected_before_any_request() {
        let dispatcher = HttpNotificationDispatcher::new(HttpDispatcherConfig::default()).unwrap();

        let err = dispatcher
            .send("not-a-number", OtpPurpose::MobileVerification, "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidDestination));
    }
}
