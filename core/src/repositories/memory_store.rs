//! In-memory verification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::VerificationRecord;
use crate::errors::StoreError;

use super::verification_store::VerificationStore;

/// Process-local store backed by a mutex-guarded map.
///
/// Suitable for tests and single-process deployments. Each trait method
/// holds the map lock for its full duration, so individual operations are
/// atomic per key.
#[derive(Debug, Default)]
pub struct InMemoryVerificationStore {
    records: Mutex<HashMap<Uuid, VerificationRecord>>,
}

impl InMemoryVerificationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl VerificationStore for InMemoryVerificationStore {
    async fn put(&self, record: VerificationRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .await
            .insert(record.verification_id, record);
        Ok(())
    }

    async fn get(&self, verification_id: Uuid) -> Result<Option<VerificationRecord>, StoreError> {
        Ok(self.records.lock().await.get(&verification_id).cloned())
    }

    async fn delete(&self, verification_id: Uuid) -> Result<(), StoreError> {
        self.records.lock().await.remove(&verification_id);
        Ok(())
    }

    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| record.expires_at > now);
        Ok(before - records.len())
    }

    async fn expired_ids(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .records
            .lock()
            .await
            .values()
            .filter(|record| record.expires_at <= now)
            .map(|record| record.verification_id)
            .collect())
    }
}
