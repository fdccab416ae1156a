//! One-time code generation.

use rand::{rngs::OsRng, RngCore};

use crate::domain::entities::CODE_LENGTH;

/// Generates a random 6-digit code using the OS CSPRNG.
///
/// The code is drawn from `100000..=999999` so the first digit is always
/// 1-9, avoiding any leading-zero ambiguity downstream. No side effects,
/// no failure mode.
pub fn generate() -> String {
    let mut rng = OsRng;
    let mut bytes = [0u8; 4];
    rng.fill_bytes(&mut bytes);
    let num = u32::from_le_bytes(bytes);
    // Modulo bias over a 900k range is negligible for a 6-digit code
    let code = 100_000 + num % 900_000;
    format!("{}", code)
}
