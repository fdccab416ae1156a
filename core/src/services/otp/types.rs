//! Result types for OTP engine operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::OtpPurpose;

/// Result of a successful generate operation. The code itself is never
/// returned to the caller; it only travels through the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResult {
    /// Handle for subsequent verify/resend/status calls
    pub verification_id: Uuid,
    /// When the issued code stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful verify operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySuccess {
    /// What the completed challenge was issued for
    pub purpose: OtpPurpose,
    /// Associated user reference, if one was supplied at generation
    pub user_id: Option<String>,
}

/// Result of a successful resend operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendResult {
    /// Expiry of the freshly issued code
    pub expires_at: DateTime<Utc>,
}

/// Read-only projection of a verification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub verification_id: Uuid,
    pub purpose: OtpPurpose,
    pub identifier: String,
    pub verified: bool,
    pub attempt_count: u32,
    pub max_attempts: u32,
    pub expires_at: DateTime<Utc>,
    /// Derived at read time; an expired record is still reported until
    /// verify or the sweeper purges it
    pub expired: bool,
    pub created_at: DateTime<Utc>,
}
