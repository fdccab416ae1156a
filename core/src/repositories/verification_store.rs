//! Storage contract for verification records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::VerificationRecord;
use crate::errors::StoreError;

/// Keyed storage of verification records.
///
/// The store owns record lifecycle: the engine only ever addresses records
/// by `verification_id`. Implementations must make each operation atomic
/// with respect to concurrent callers on the same key; multi-step
/// read-modify-write sequences are serialized by the engine's per-record
/// locks, not by the store.
///
/// The in-memory implementation backs tests and single-process
/// deployments; durable backends plug in behind the same contract.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Inserts or overwrites a record by its `verification_id`.
    async fn put(&self, record: VerificationRecord) -> Result<(), StoreError>;

    /// Fetches a record by id, or `None` if it does not exist.
    async fn get(&self, verification_id: Uuid) -> Result<Option<VerificationRecord>, StoreError>;

    /// Removes a record by id. Removing a missing record is not an error.
    async fn delete(&self, verification_id: Uuid) -> Result<(), StoreError>;

    /// Bulk-removes every record whose `expires_at <= now` and returns the
    /// number removed. Intended for callers that do not need the engine's
    /// per-record lock discipline (offline maintenance, tests).
    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;

    /// Lists the ids of records whose `expires_at <= now` without removing
    /// them. The engine's sweeper deletes them one by one under the same
    /// per-record locks as verify/resend.
    async fn expired_ids(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, StoreError>;
}
