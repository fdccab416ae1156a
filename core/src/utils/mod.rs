//! Small shared helpers.

mod mask;

pub use mask::mask_identifier;
