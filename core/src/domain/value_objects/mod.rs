//! Value objects shared across the domain layer.

pub mod purpose;

pub use purpose::{OtpPurpose, ParseOtpPurposeError};
