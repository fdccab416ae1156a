//! Challenge purpose classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a one-time code is being issued for.
///
/// The purpose selects the notification template used by the dispatcher
/// and the identifier validation rules applied at the API edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Confirming ownership of a mobile number
    MobileVerification,
    /// Confirming ownership of an email address
    EmailVerification,
    /// Authorizing a password reset
    PasswordReset,
}

impl OtpPurpose {
    /// Stable wire name of the purpose, matching the notification
    /// service's template keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::MobileVerification => "mobile_verification",
            OtpPurpose::EmailVerification => "email_verification",
            OtpPurpose::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown purpose string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown otp purpose: {0}")]
pub struct ParseOtpPurposeError(pub String);

impl FromStr for OtpPurpose {
    type Err = ParseOtpPurposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile_verification" => Ok(OtpPurpose::MobileVerification),
            "email_verification" => Ok(OtpPurpose::EmailVerification),
            "password_reset" => Ok(OtpPurpose::PasswordReset),
            other => Err(ParseOtpPurposeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(OtpPurpose::MobileVerification.to_string(), "mobile_verification");
        assert_eq!(OtpPurpose::EmailVerification.to_string(), "email_verification");
        assert_eq!(OtpPurpose::PasswordReset.to_string(), "password_reset");
    }

    #[test]
    fn test_from_str_round_trip() {
        for purpose in [
            OtpPurpose::MobileVerification,
            OtpPurpose::EmailVerification,
            OtpPurpose::PasswordReset,
        ] {
            assert_eq!(purpose.as_str().parse::<OtpPurpose>(), Ok(purpose));
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "push_notification".parse::<OtpPurpose>().unwrap_err();
        assert_eq!(err, ParseOtpPurposeError("push_notification".to_string()));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&OtpPurpose::PasswordReset).unwrap();
        assert_eq!(json, "\"password_reset\"");

        let parsed: OtpPurpose = serde_json::from_str("\"mobile_verification\"").unwrap();
        assert_eq!(parsed, OtpPurpose::MobileVerification);
    }
}
