use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::classifier::Language;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedCodeRecord {
    pub share_id: String,
    pub code: String,
    pub language: Language,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("share id already taken: {0}")]
    Conflict(String),

    #[error("share store unavailable: {0}")]
    Unavailable(String),
}

/// Backing storage for shared snippets.
///
/// Implementations own their locking; the orchestrator only calls through this trait.
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// Insert a new record. Fails with `Conflict` if the id is already present.
    async fn put(&self, record: SharedCodeRecord) -> Result<(), StoreError>;

    async fn get(&self, share_id: &str) -> Result<Option<SharedCodeRecord>, StoreError>;

    /// All records, oldest first.
    async fn list(&self) -> Result<Vec<SharedCodeRecord>, StoreError>;
}

#[derive(Default)]
struct Registry {
    records: Vec<SharedCodeRecord>,
    index: HashMap<String, usize>,
}

/// Process-lifetime store. Nothing is ever evicted.
#[derive(Default)]
pub struct InMemoryShareStore {
    inner: Mutex<Registry>,
}

impl InMemoryShareStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Registry>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl ShareStore for InMemoryShareStore {
    async fn put(&self, record: SharedCodeRecord) -> Result<(), StoreError> {
        let mut registry = self.lock()?;
        if registry.index.contains_key(&record.share_id) {
            return Err(StoreError::Conflict(record.share_id));
        }
        let position = registry.records.len();
        registry.index.insert(record.share_id.clone(), position);
        registry.records.push(record);
        Ok(())
    }

    async fn get(&self, share_id: &str) -> Result<Option<SharedCodeRecord>, StoreError> {
        let registry = self.lock()?;
        Ok(registry
            .index
            .get(share_id)
            .map(|&position| registry.records[position].clone()))
    }

    async fn list(&self) -> Result<Vec<SharedCodeRecord>, StoreError> {
        Ok(self.lock()?.records.clone())
    }
}
