//! Error types for the OTP lifecycle.
//!
//! Every condition the engine can detect during normal operation is an
//! expected outcome and is modelled as a typed `OtpError` variant, so
//! callers can branch deterministically. Infrastructure faults (store
//! backend down, dispatch channel broken) travel through the same enum
//! but are distinguishable via [`OtpError::is_infrastructure`].

use thiserror::Error;
use uuid::Uuid;

/// Outcome of an OTP engine operation.
pub type OtpResult<T> = Result<T, OtpError>;

/// Expected failure modes of the OTP engine, plus infrastructure faults.
#[derive(Error, Debug)]
pub enum OtpError {
    /// Too many generation requests for this identifier and purpose
    #[error("too many code requests, retry in {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: i64 },

    /// Dispatch to the notification channel failed or timed out. The
    /// record remains stored; the caller may resend once the channel
    /// recovers, which is why the verification id is carried here.
    #[error("notification dispatch failed for verification {verification_id}: {reason}")]
    NotificationFailed {
        verification_id: Uuid,
        reason: String,
    },

    /// Unknown verification id (never issued, or already purged)
    #[error("invalid verification id")]
    VerificationIdInvalid,

    /// The code's validity window has elapsed; the record was purged
    #[error("verification code has expired")]
    OtpExpired,

    /// Supplied identifier does not match the record. Pre-charge: this
    /// never consumes an attempt and never mutates the record.
    #[error("identifier does not match verification record")]
    IdentifierMismatch,

    /// Attempt budget spent; the record was purged
    #[error("maximum verification attempts exceeded")]
    MaxAttemptsExceeded,

    /// Wrong code; the attempt was charged and persisted
    #[error("invalid verification code, {remaining_attempts} attempt(s) remaining")]
    OtpInvalid { remaining_attempts: u32 },

    /// The challenge was already completed
    #[error("otp already verified")]
    OtpAlreadyVerified,

    /// Resend requested before the cooldown interval elapsed
    #[error("please wait {seconds_remaining} seconds before resending")]
    ResendCooldownActive { seconds_remaining: i64 },

    /// Verification store backend failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OtpError {
    /// Stable error code for API payloads and logs.
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::RateLimited { .. } => "RATE_LIMITED",
            OtpError::NotificationFailed { .. } => "NOTIFICATION_FAILED",
            OtpError::VerificationIdInvalid => "VERIFICATION_ID_INVALID",
            OtpError::OtpExpired => "OTP_EXPIRED",
            OtpError::IdentifierMismatch => "IDENTIFIER_MISMATCH",
            OtpError::MaxAttemptsExceeded => "MAX_ATTEMPTS_EXCEEDED",
            OtpError::OtpInvalid { .. } => "OTP_INVALID",
            OtpError::OtpAlreadyVerified => "OTP_ALREADY_VERIFIED",
            OtpError::ResendCooldownActive { .. } => "RESEND_COOLDOWN_ACTIVE",
            OtpError::Store(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Whether this is a genuine infrastructure fault rather than an
    /// expected business outcome.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, OtpError::Store(_))
    }
}

/// Verification store backend errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("verification store unavailable: {0}")]
    Unavailable(String),
}

/// Notification dispatcher errors.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The destination identifier is not deliverable on this channel
    #[error("invalid destination identifier")]
    InvalidDestination,

    /// Message template lookup or rendering failed
    #[error("message rendering failed: {0}")]
    Template(String),

    /// The delivery channel itself failed
    #[error("delivery channel failure: {0}")]
    Channel(String),
}
