//! # FreedmAI OTP Core
//!
//! Core OTP lifecycle logic for the FreedmAI backend. This crate contains
//! the verification record entity, the issuance/verification engine with
//! its rate limiter and resend cooldown, the storage contract with an
//! in-memory implementation, and the notification dispatcher interface.
//!
//! The HTTP layer and concrete notification channels live outside this
//! crate; see `otp_infra` for dispatcher implementations.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod utils;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
