//! Tests for the OTP engine and its collaborators.
