//! Domain entities representing core business objects.

pub mod verification_record;

// Re-export commonly used types
pub use verification_record::{
    VerificationRecord, CODE_LENGTH, DEFAULT_CODE_TTL_SECONDS,
    DEFAULT_RESEND_COOLDOWN_SECONDS, MAX_ATTEMPTS,
};
