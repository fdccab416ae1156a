//! Identifier masking for logs.

/// Masks a destination identifier for logging.
///
/// Phone numbers keep their leading `+` and last four digits; email
/// addresses keep the first character of the local part and the full
/// domain. Identifiers are personal data and must never appear unmasked
/// in logs.
///
/// # Example
///
/// ```
/// use otp_core::utils::mask_identifier;
///
/// assert_eq!(mask_identifier("+919876543210"), "+********3210");
/// assert_eq!(mask_identifier("alice@example.com"), "a****@example.com");
/// ```
pub fn mask_identifier(identifier: &str) -> String {
    if let Some((local, domain)) = identifier.split_once('@') {
        let mut masked = String::new();
        masked.push(local.chars().next().unwrap_or('*'));
        masked.push_str(&"*".repeat(local.chars().count().saturating_sub(1).max(1)));
        masked.push('@');
        masked.push_str(domain);
        return masked;
    }

    // Work in characters, not bytes: the identifier is caller input and
    // may contain multi-byte characters
    let chars: Vec<char> = identifier.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let visible: String = chars[chars.len() - 4..].iter().collect();
    if chars[0] == '+' {
        format!("+{}{}", "*".repeat(chars.len() - 5), visible)
    } else {
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}
