//! Resend cooldown enforcement.

use chrono::{DateTime, Utc};

use crate::domain::entities::{VerificationRecord, DEFAULT_RESEND_COOLDOWN_SECONDS};

/// Enforces the minimum interval between consecutive resend operations on
/// the same record. Pure function of the record and the current time; no
/// independent state.
#[derive(Debug, Clone, Copy)]
pub struct ResendCooldownGuard {
    cooldown_seconds: i64,
}

impl ResendCooldownGuard {
    /// Creates a guard with the given cooldown interval.
    pub fn new(cooldown_seconds: i64) -> Self {
        Self { cooldown_seconds }
    }

    /// Checks whether the record may be resent at `now`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The cooldown has elapsed
    /// * `Err(seconds_remaining)` - Seconds the caller must still wait
    pub fn check(&self, record: &VerificationRecord, now: DateTime<Utc>) -> Result<(), i64> {
        let elapsed = (now - record.last_resent_at).num_seconds();
        if elapsed < self.cooldown_seconds {
            Err(self.cooldown_seconds - elapsed)
        } else {
            Ok(())
        }
    }
}

impl Default for ResendCooldownGuard {
    fn default() -> Self {
        Self::new(DEFAULT_RESEND_COOLDOWN_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::OtpPurpose;
    use crate::services::otp::code_generator;
    use chrono::Duration;

    fn record() -> VerificationRecord {
        VerificationRecord::new(
            "+919876543210",
            OtpPurpose::MobileVerification,
            None,
            code_generator::generate(),
            Duration::seconds(300),
        )
    }

    #[test]
    fn test_denies_immediately_after_issuance() {
        let guard = ResendCooldownGuard::default();
        let record = record();

        let remaining = guard.check(&record, record.last_resent_at).unwrap_err();
        assert_eq!(remaining, DEFAULT_RESEND_COOLDOWN_SECONDS);
    }

    #[test]
    fn test_remaining_seconds_counts_down() {
        let guard = ResendCooldownGuard::new(60);
        let record = record();

        let at = record.last_resent_at + Duration::seconds(45);
        assert_eq!(guard.check(&record, at), Err(15));
    }

    #[test]
    fn test_allows_once_cooldown_elapsed() {
        let guard = ResendCooldownGuard::new(60);
        let record = record();

        let at = record.last_resent_at + Duration::seconds(60);
        assert_eq!(guard.check(&record, at), Ok(()));
    }

    #[test]
    fn test_zero_cooldown_always_allows() {
        let guard = ResendCooldownGuard::new(0);
        let record = record();

        assert_eq!(guard.check(&record, record.last_resent_at), Ok(()));
    }
}
