//! Phone number validation helpers.

use once_cell::sync::Lazy;
use regex::Regex;

static E164_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{9,14}$").expect("valid E.164 regex"));

// Indian mobile numbers start with 6-9 after the +91 country code
static INDIAN_MOBILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+91[6-9]\d{9}$").expect("valid Indian mobile regex"));

/// Checks E.164 shape: `+`, a non-zero leading digit, 10-15 digits total.
pub fn is_valid_e164(phone: &str) -> bool {
    E164_REGEX.is_match(phone)
}

/// Checks the `+91XXXXXXXXXX` format accepted for mobile verification.
pub fn is_valid_indian_mobile(phone: &str) -> bool {
    INDIAN_MOBILE_REGEX.is_match(phone)
}
