//! SMS template registry.
//!
//! Templates carry `{{OTP_CODE}}` and `{{EXPIRY_MINUTES}}` placeholders;
//! rendering substitutes both and enforces the single-segment SMS length
//! limit. The purpose-to-template mapping mirrors the notification
//! service's template keys.

use serde::Serialize;

use otp_core::domain::entities::{
    CODE_LENGTH, DEFAULT_CODE_TTL_SECONDS, DEFAULT_RESEND_COOLDOWN_SECONDS, MAX_ATTEMPTS,
};
use otp_core::domain::value_objects::OtpPurpose;
use otp_core::errors::DispatchError;

/// A registered SMS template.
#[derive(Debug, Clone, Copy)]
pub struct SmsTemplate {
    pub template: &'static str,
    pub sender_id: &'static str,
    pub max_length: usize,
}

const MOBILE_VERIFICATION: SmsTemplate = SmsTemplate {
    template: "FreedmAI: Your mobile verification code is {{OTP_CODE}}. Valid for {{EXPIRY_MINUTES}} minutes. Do not share this code with anyone. - FreedmAI Team",
    sender_id: "FREEDM",
    max_length: 160,
};

const EMAIL_VERIFICATION: SmsTemplate = SmsTemplate {
    template: "FreedmAI: Your email verification code is {{OTP_CODE}}. Valid for {{EXPIRY_MINUTES}} minutes. Enter this code to verify your email address. - FreedmAI Team",
    sender_id: "FREEDM",
    max_length: 160,
};

const PASSWORD_RESET: SmsTemplate = SmsTemplate {
    template: "FreedmAI: Your password reset code is {{OTP_CODE}}. Valid for {{EXPIRY_MINUTES}} minutes. If you didn't request this, please ignore. - FreedmAI Team",
    sender_id: "FREEDM",
    max_length: 160,
};

/// Looks up the template for a purpose.
pub fn template_for(purpose: OtpPurpose) -> &'static SmsTemplate {
    match purpose {
        OtpPurpose::MobileVerification => &MOBILE_VERIFICATION,
        OtpPurpose::EmailVerification => &EMAIL_VERIFICATION,
        OtpPurpose::PasswordReset => &PASSWORD_RESET,
    }
}

/// A template with its variables substituted.
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    pub message: String,
    pub sender_id: &'static str,
}

/// Renders the template for a purpose.
///
/// # Errors
///
/// Fails with `DispatchError::Template` if the rendered message exceeds
/// the template's length limit.
pub fn render_message(
    purpose: OtpPurpose,
    code: &str,
    expiry_minutes: i64,
) -> Result<RenderedMessage, DispatchError> {
    let template = template_for(purpose);
    let message = template
        .template
        .replace("{{OTP_CODE}}", code)
        .replace("{{EXPIRY_MINUTES}}", &expiry_minutes.to_string());

    if message.len() > template.max_length {
        return Err(DispatchError::Template(format!(
            "message too long: {} characters (max: {})",
            message.len(),
            template.max_length
        )));
    }

    Ok(RenderedMessage {
        message,
        sender_id: template.sender_id,
    })
}

/// Client-facing OTP parameters, shown alongside code entry forms.
#[derive(Debug, Clone, Serialize)]
pub struct OtpSettings {
    pub length: usize,
    pub expiry_minutes: i64,
    pub max_attempts: u32,
    pub resend_cooldown_seconds: i64,
}

/// The product's standard OTP parameters.
pub fn otp_settings() -> OtpSettings {
    OtpSettings {
        length: CODE_LENGTH,
        expiry_minutes: DEFAULT_CODE_TTL_SECONDS / 60,
        max_attempts: MAX_ATTEMPTS,
        resend_cooldown_seconds: DEFAULT_RESEND_COOLDOWN_SECONDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let rendered = render_message(OtpPurpose::MobileVerification, "123456", 5).unwrap();

        assert!(rendered.message.contains("123456"));
        assert!(rendered.message.contains("5 minutes"));
        assert!(!rendered.message.contains("{{"));
        assert_eq!(rendered.sender_id, "FREEDM");
    }

    #[test]
    fn test_each_purpose_has_a_distinct_template() {
        let mobile = render_message(OtpPurpose::MobileVerification, "111111", 5).unwrap();
        let email = render_message(OtpPurpose::EmailVerification, "111111", 5).unwrap();
        let reset = render_message(OtpPurpose::PasswordReset, "111111", 5).unwrap();

        assert!(mobile.message.contains("mobile verification"));
        assert!(email.message.contains("email verification"));
        assert!(reset.message.contains("password reset"));
    }

    #[test]
    fn test_rendered_messages_fit_one_sms_segment() {
        for purpose in [
            OtpPurpose::MobileVerification,
            OtpPurpose::EmailVerification,
            OtpPurpose::PasswordReset,
        ] {
            let rendered = render_message(purpose, "999999", 5).unwrap();
            assert!(rendered.message.len() <= 160);
        }
    }

    #[test]
    fn test_settings_match_engine_defaults() {
        let settings = otp_settings();
        assert_eq!(settings.length, 6);
        assert_eq!(settings.expiry_minutes, 5);
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.resend_cooldown_seconds, 60);
    }
}
