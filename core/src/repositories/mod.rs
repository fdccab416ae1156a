//! Repository interfaces and the in-memory verification store.

pub mod memory_store;
pub mod verification_store;

pub use memory_store::InMemoryVerificationStore;
pub use verification_store::VerificationStore;
