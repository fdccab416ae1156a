//! Verification record entity for OTP-based identity checks.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::OtpPurpose;

/// Maximum number of verification attempts allowed
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of the one-time code
pub const CODE_LENGTH: usize = 6;

/// Default validity window for a code (5 minutes)
pub const DEFAULT_CODE_TTL_SECONDS: i64 = 300;

/// Default minimum interval between resend operations
pub const DEFAULT_RESEND_COOLDOWN_SECONDS: i64 = 60;

/// A single OTP challenge, from issuance through verification or expiry.
///
/// The record is owned exclusively by the verification store; the engine
/// addresses it by `verification_id` only. `identifier`, `purpose` and
/// `user_id` are immutable after creation. Once `verified` is set the
/// record is never mutated again, only removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Unique lookup key for this challenge
    pub verification_id: Uuid,

    /// Destination address (phone number or email) the code was issued for
    pub identifier: String,

    /// Classification selecting the notification template and validation rules
    pub purpose: OtpPurpose,

    /// Optional opaque reference to an associated user
    pub user_id: Option<String>,

    /// The currently active one-time code (rotated on resend)
    pub code: String,

    /// Number of verification attempts charged against this record
    pub attempt_count: u32,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the active code expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp of the last issuance (creation counts as the first send)
    pub last_resent_at: DateTime<Utc>,

    /// Whether the challenge has been completed successfully
    pub verified: bool,

    /// Timestamp of the successful verification, if any
    pub verified_at: Option<DateTime<Utc>>,
}

impl VerificationRecord {
    /// Creates a new record for a freshly generated code.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Destination address the code is issued to
    /// * `purpose` - Challenge classification
    /// * `user_id` - Optional associated user reference
    /// * `code` - The 6-digit code produced by the code generator
    /// * `ttl` - Validity window for the code
    pub fn new(
        identifier: impl Into<String>,
        purpose: OtpPurpose,
        user_id: Option<String>,
        code: String,
        ttl: Duration,
    ) -> Self {
        debug_assert!(
            code.len() == CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit()),
            "code must be exactly {} ASCII digits",
            CODE_LENGTH
        );

        let now = Utc::now();
        Self {
            verification_id: Uuid::new_v4(),
            identifier: identifier.into(),
            purpose,
            user_id,
            code,
            attempt_count: 0,
            created_at: now,
            expires_at: now + ttl,
            last_resent_at: now,
            verified: false,
            verified_at: None,
        }
    }

    /// Checks whether the active code is expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Charges one verification attempt against the record.
    pub fn charge_attempt(&mut self) {
        self.attempt_count += 1;
    }

    /// Compares a candidate code against the active code in constant time.
    pub fn matches_code(&self, candidate: &str) -> bool {
        self.code.len() == candidate.len()
            && constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }

    /// Marks the challenge as completed. Terminal: callers must not mutate
    /// the record afterwards.
    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.verified = true;
        self.verified_at = Some(now);
    }

    /// Replaces the active code for a resend.
    ///
    /// Resets the attempt counter, extends the expiry window from `now`
    /// and stamps `last_resent_at`.
    pub fn rotate_code(&mut self, code: String, ttl: Duration, now: DateTime<Utc>) {
        debug_assert!(
            code.len() == CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit()),
            "code must be exactly {} ASCII digits",
            CODE_LENGTH
        );

        self.code = code;
        self.attempt_count = 0;
        self.expires_at = now + ttl;
        self.last_resent_at = now;
    }

    /// Number of attempts left before the record is invalidated.
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempt_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::otp::code_generator;

    fn sample_record(ttl_seconds: i64) -> VerificationRecord {
        VerificationRecord::new(
            "+919876543210",
            OtpPurpose::MobileVerification,
            Some("user-42".to_string()),
            code_generator::generate(),
            Duration::seconds(ttl_seconds),
        )
    }

    #[test]
    fn test_new_record_defaults() {
        let record = sample_record(DEFAULT_CODE_TTL_SECONDS);

        assert_eq!(record.identifier, "+919876543210");
        assert_eq!(record.purpose, OtpPurpose::MobileVerification);
        assert_eq!(record.user_id.as_deref(), Some("user-42"));
        assert_eq!(record.code.len(), CODE_LENGTH);
        assert_eq!(record.attempt_count, 0);
        assert!(!record.verified);
        assert!(record.verified_at.is_none());
        assert_eq!(
            record.expires_at,
            record.created_at + Duration::seconds(DEFAULT_CODE_TTL_SECONDS)
        );
        assert_eq!(record.last_resent_at, record.created_at);
    }

    #[test]
    fn test_expiry_boundary() {
        let record = sample_record(DEFAULT_CODE_TTL_SECONDS);

        assert!(!record.is_expired_at(record.created_at));
        assert!(!record.is_expired_at(record.expires_at));
        assert!(record.is_expired_at(record.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_matches_code_rejects_wrong_code() {
        let record = sample_record(DEFAULT_CODE_TTL_SECONDS);
        let correct = record.code.clone();

        assert!(record.matches_code(&correct));
        // A code of the wrong length must never match
        assert!(!record.matches_code(&correct[..5]));

        let wrong = if correct == "000000" { "000001" } else { "000000" };
        assert!(!record.matches_code(wrong));
    }

    #[test]
    fn test_mark_verified_is_terminal_state() {
        let mut record = sample_record(DEFAULT_CODE_TTL_SECONDS);
        let now = Utc::now();

        record.charge_attempt();
        record.mark_verified(now);

        assert!(record.verified);
        assert_eq!(record.verified_at, Some(now));
        assert_eq!(record.attempt_count, 1);
    }

    #[test]
    fn test_rotate_code_resets_lifecycle_fields() {
        let mut record = sample_record(DEFAULT_CODE_TTL_SECONDS);
        let original_code = record.code.clone();
        let original_expiry = record.expires_at;

        record.charge_attempt();
        record.charge_attempt();

        let later = Utc::now() + Duration::seconds(90);
        record.rotate_code("123456".to_string(), Duration::seconds(300), later);

        assert_ne!(record.code, original_code);
        assert_eq!(record.attempt_count, 0);
        assert_eq!(record.expires_at, later + Duration::seconds(300));
        assert_eq!(record.last_resent_at, later);
        assert!(record.expires_at > original_expiry);
    }

    #[test]
    fn test_remaining_attempts_saturates_at_zero() {
        let mut record = sample_record(DEFAULT_CODE_TTL_SECONDS);

        assert_eq!(record.remaining_attempts(MAX_ATTEMPTS), MAX_ATTEMPTS);
        for _ in 0..MAX_ATTEMPTS + 1 {
            record.charge_attempt();
        }
        assert_eq!(record.remaining_attempts(MAX_ATTEMPTS), 0);
    }

    #[test]
    fn test_serialization_round_trip() {
        let record = sample_record(DEFAULT_CODE_TTL_SECONDS);

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: VerificationRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
