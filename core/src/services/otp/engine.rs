//! The OTP engine: orchestrates generate, verify, resend and status.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use uuid::Uuid;

use crate::domain::entities::VerificationRecord;
use crate::domain::value_objects::OtpPurpose;
use crate::errors::{OtpError, OtpResult};
use crate::repositories::VerificationStore;
use crate::utils::mask_identifier;

use super::code_generator;
use super::config::OtpEngineConfig;
use super::cooldown::ResendCooldownGuard;
use super::key_locks::KeyLocks;
use super::rate_limiter::{RateLimitDecision, RateLimiter};
use super::traits::NotificationDispatcher;
use super::types::{GenerateResult, ResendResult, StatusSnapshot, VerifySuccess};

/// State machine driving a verification record from issuance through
/// verification, expiry or attempt exhaustion.
///
/// All collaborators are injected at construction; the engine holds no
/// process-wide state. Every read-modify-write on a record runs under
/// that record's lock (see [`KeyLocks`]); notification dispatch always
/// happens after the lock is released so a slow provider cannot stall
/// unrelated verify/resend calls.
pub struct OtpEngine<S, L, D>
where
    S: VerificationStore,
    L: RateLimiter,
    D: NotificationDispatcher,
{
    store: Arc<S>,
    limiter: Arc<L>,
    dispatcher: Arc<D>,
    cooldown: ResendCooldownGuard,
    config: OtpEngineConfig,
    locks: KeyLocks,
}

impl<S, L, D> OtpEngine<S, L, D>
where
    S: VerificationStore,
    L: RateLimiter,
    D: NotificationDispatcher,
{
    /// Creates an engine over the given collaborators.
    pub fn new(
        store: Arc<S>,
        limiter: Arc<L>,
        dispatcher: Arc<D>,
        config: OtpEngineConfig,
    ) -> Self {
        let cooldown = ResendCooldownGuard::new(config.resend_cooldown_seconds);
        Self {
            store,
            limiter,
            dispatcher,
            cooldown,
            config,
            locks: KeyLocks::new(),
        }
    }

    /// Engine configuration in effect.
    pub fn config(&self) -> &OtpEngineConfig {
        &self.config
    }

    /// Issues a new code for `identifier` and dispatches it.
    ///
    /// The record is durably stored before dispatch. If dispatch fails or
    /// times out, the call fails with `NotificationFailed` but the record
    /// is kept: the caller may resend, or the sweeper will eventually
    /// collect it.
    ///
    /// # Returns
    ///
    /// * `Ok(GenerateResult)` - Verification id and expiry; never the code
    /// * `Err(OtpError)` - `RateLimited`, `NotificationFailed` or a store fault
    pub async fn generate(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
        user_id: Option<String>,
    ) -> OtpResult<GenerateResult> {
        if let RateLimitDecision::Denied {
            retry_after_seconds,
        } = self.limiter.check(identifier, purpose).await
        {
            tracing::warn!(
                identifier = %mask_identifier(identifier),
                purpose = %purpose,
                retry_after_seconds,
                event = "otp_rate_limited",
                "Code generation request rejected by rate limiter"
            );
            return Err(OtpError::RateLimited {
                retry_after_seconds,
            });
        }

        let record = VerificationRecord::new(
            identifier,
            purpose,
            user_id,
            code_generator::generate(),
            self.config.code_ttl(),
        );
        let verification_id = record.verification_id;
        let expires_at = record.expires_at;
        let code = record.code.clone();

        self.store.put(record).await?;

        tracing::info!(
            identifier = %mask_identifier(identifier),
            purpose = %purpose,
            verification_id = %verification_id,
            event = "otp_generated",
            "Generated new verification code"
        );

        self.dispatch(identifier, purpose, &code, verification_id)
            .await?;

        Ok(GenerateResult {
            verification_id,
            expires_at,
        })
    }

    /// Verifies a candidate code against a record.
    ///
    /// Check order is fixed: lookup, expiry, identifier match, prior
    /// verification, attempt exhaustion, code comparison. Identifier
    /// mismatch is pre-charge and must never consume an attempt; every
    /// check after it does.
    pub async fn verify(
        &self,
        identifier: &str,
        code: &str,
        verification_id: Uuid,
    ) -> OtpResult<VerifySuccess> {
        let _guard = self.locks.acquire(verification_id).await;

        let mut record = self
            .store
            .get(verification_id)
            .await?
            .ok_or(OtpError::VerificationIdInvalid)?;

        let now = Utc::now();
        if record.is_expired_at(now) {
            self.store.delete(verification_id).await?;
            tracing::info!(
                verification_id = %verification_id,
                event = "otp_expired",
                "Verification code expired, record purged"
            );
            return Err(OtpError::OtpExpired);
        }

        if record.identifier != identifier {
            tracing::warn!(
                verification_id = %verification_id,
                identifier = %mask_identifier(identifier),
                event = "otp_identifier_mismatch",
                "Verify called with a different identifier than the record's"
            );
            return Err(OtpError::IdentifierMismatch);
        }

        // A completed record is immutable until removal
        if record.verified {
            return Err(OtpError::OtpAlreadyVerified);
        }

        if record.attempt_count >= self.config.max_attempts {
            self.store.delete(verification_id).await?;
            tracing::warn!(
                verification_id = %verification_id,
                event = "otp_attempts_exhausted",
                "Attempt budget spent, record purged"
            );
            return Err(OtpError::MaxAttemptsExceeded);
        }

        record.charge_attempt();

        if !record.matches_code(code) {
            let remaining_attempts = record.remaining_attempts(self.config.max_attempts);
            self.store.put(record).await?;
            tracing::warn!(
                verification_id = %verification_id,
                remaining_attempts,
                event = "otp_verification_failed",
                "Wrong verification code supplied"
            );
            return Err(OtpError::OtpInvalid { remaining_attempts });
        }

        record.mark_verified(now);
        let purpose = record.purpose;
        let user_id = record.user_id.clone();
        self.store.put(record).await?;

        tracing::info!(
            verification_id = %verification_id,
            purpose = %purpose,
            event = "otp_verified",
            "Verification code accepted"
        );

        Ok(VerifySuccess { purpose, user_id })
    }

    /// Rotates the code on an existing record and dispatches it again.
    ///
    /// Resets the attempt budget and extends the expiry window. Dispatch
    /// failure policy is identical to [`Self::generate`].
    pub async fn resend(&self, verification_id: Uuid) -> OtpResult<ResendResult> {
        let (identifier, purpose, code, expires_at) = {
            let _guard = self.locks.acquire(verification_id).await;

            let mut record = self
                .store
                .get(verification_id)
                .await?
                .ok_or(OtpError::VerificationIdInvalid)?;

            if record.verified {
                return Err(OtpError::OtpAlreadyVerified);
            }

            let now = Utc::now();
            if let Err(seconds_remaining) = self.cooldown.check(&record, now) {
                tracing::info!(
                    verification_id = %verification_id,
                    seconds_remaining,
                    event = "otp_resend_cooldown",
                    "Resend rejected, cooldown still active"
                );
                return Err(OtpError::ResendCooldownActive { seconds_remaining });
            }

            record.rotate_code(code_generator::generate(), self.config.code_ttl(), now);
            let identifier = record.identifier.clone();
            let purpose = record.purpose;
            let code = record.code.clone();
            let expires_at = record.expires_at;
            self.store.put(record).await?;

            tracing::info!(
                verification_id = %verification_id,
                purpose = %purpose,
                event = "otp_resent",
                "Rotated verification code for resend"
            );

            (identifier, purpose, code, expires_at)
        };

        // Lock released; the dispatch call must not block other operations
        // on this record
        self.dispatch(&identifier, purpose, &code, verification_id)
            .await?;

        Ok(ResendResult { expires_at })
    }

    /// Read-only snapshot of a record.
    ///
    /// Never mutates and never deletes, even when the record is expired;
    /// expiry is only acted upon by verify and the sweeper.
    pub async fn status(&self, verification_id: Uuid) -> OtpResult<StatusSnapshot> {
        let record = self
            .store
            .get(verification_id)
            .await?
            .ok_or(OtpError::VerificationIdInvalid)?;

        Ok(StatusSnapshot {
            verification_id: record.verification_id,
            purpose: record.purpose,
            identifier: record.identifier.clone(),
            verified: record.verified,
            attempt_count: record.attempt_count,
            max_attempts: self.config.max_attempts,
            expires_at: record.expires_at,
            expired: record.is_expired_at(Utc::now()),
            created_at: record.created_at,
        })
    }

    /// Removes every expired record, taking each record's lock before
    /// deleting so an in-flight verify or resend is never clobbered.
    ///
    /// # Returns
    ///
    /// Number of records removed.
    pub async fn sweep_expired(&self) -> OtpResult<usize> {
        let now = Utc::now();
        let mut removed = 0;

        for verification_id in self.store.expired_ids(now).await? {
            let _guard = self.locks.acquire(verification_id).await;
            if let Some(record) = self.store.get(verification_id).await? {
                // Re-check under the lock: a resend may have extended the
                // expiry since enumeration
                if record.is_expired_at(now) {
                    self.store.delete(verification_id).await?;
                    removed += 1;
                }
            }
        }

        self.locks.prune().await;

        if removed > 0 {
            tracing::info!(removed, event = "otp_sweep", "Purged expired verification records");
        }

        Ok(removed)
    }

    /// Runs one dispatcher call under the configured timeout.
    async fn dispatch(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
        code: &str,
        verification_id: Uuid,
    ) -> OtpResult<()> {
        let timeout = StdDuration::from_millis(self.config.dispatch_timeout_ms);
        let send = self.dispatcher.send(identifier, purpose, code);

        match tokio::time::timeout(timeout, send).await {
            Ok(Ok(message_id)) => {
                tracing::info!(
                    verification_id = %verification_id,
                    channel = self.dispatcher.channel_name(),
                    message_id = %message_id,
                    event = "otp_dispatched",
                    "Verification code handed to notification channel"
                );
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::error!(
                    verification_id = %verification_id,
                    channel = self.dispatcher.channel_name(),
                    error = %e,
                    event = "otp_dispatch_failed",
                    "Notification dispatch failed, record retained for resend"
                );
                Err(OtpError::NotificationFailed {
                    verification_id,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                tracing::error!(
                    verification_id = %verification_id,
                    channel = self.dispatcher.channel_name(),
                    timeout_ms = self.config.dispatch_timeout_ms,
                    event = "otp_dispatch_timeout",
                    "Notification dispatch timed out, record retained for resend"
                );
                Err(OtpError::NotificationFailed {
                    verification_id,
                    reason: format!(
                        "dispatch timed out after {}ms",
                        self.config.dispatch_timeout_ms
                    ),
                })
            }
        }
    }
}
