use async_trait::async_trait;
use quiz_core::model::{TopicId, TopicPerformance, UserProgress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

use crate::blob::{
    PERFORMANCE_KEY, PROGRESS_KEY, TopicPerformanceRecord, decode_performance, decode_progress,
    encode_performance, encode_progress, performance_entries,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for per-topic quiz performance.
#[async_trait]
pub trait PerformanceRepository: Send + Sync {
    /// Fetch the record for a topic, if any attempt has been recorded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the table cannot be read or decoded.
    async fn get_performance(
        &self,
        topic: &TopicId,
    ) -> Result<Option<TopicPerformance>, StorageError>;

    /// Insert or replace the record for a topic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the table cannot be read, encoded or written.
    async fn put_performance(
        &self,
        topic: &TopicId,
        performance: &TopicPerformance,
    ) -> Result<(), StorageError>;

    /// All records, ordered by topic id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the table cannot be read or decoded.
    async fn list_performance(&self) -> Result<Vec<(TopicId, TopicPerformance)>, StorageError>;
}

/// Repository contract for the learner-wide progress record.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be read or decoded.
    async fn get_progress(&self) -> Result<Option<UserProgress>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be encoded or written.
    async fn save_progress(&self, progress: &UserProgress) -> Result<(), StorageError>;
}

/// In-memory key-value store for testing and prototyping.
///
/// Values are kept in their encoded JSON form so the in-memory backend goes
/// through the same blob layout as the persistent one.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Raw stored value for a key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_blob(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    /// Overwrite a raw value, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw_blob(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.into());
        Ok(())
    }
}

#[async_trait]
impl PerformanceRepository for InMemoryRepository {
    async fn get_performance(
        &self,
        topic: &TopicId,
    ) -> Result<Option<TopicPerformance>, StorageError> {
        let raw = self.raw_blob(PERFORMANCE_KEY)?;
        let table = decode_performance(raw.as_deref())?;
        Ok(table
            .get(topic.as_str())
            .copied()
            .map(TopicPerformanceRecord::into_performance))
    }

    async fn put_performance(
        &self,
        topic: &TopicId,
        performance: &TopicPerformance,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut table = decode_performance(guard.get(PERFORMANCE_KEY).map(String::as_str))?;
        table.insert(
            topic.as_str().to_owned(),
            TopicPerformanceRecord::from_performance(performance),
        );
        let encoded = encode_performance(&table)?;
        debug!(topic = %topic, topics = table.len(), "writing performance table");
        guard.insert(PERFORMANCE_KEY.to_owned(), encoded);
        Ok(())
    }

    async fn list_performance(&self) -> Result<Vec<(TopicId, TopicPerformance)>, StorageError> {
        let raw = self.raw_blob(PERFORMANCE_KEY)?;
        performance_entries(decode_performance(raw.as_deref())?)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self) -> Result<Option<UserProgress>, StorageError> {
        self.raw_blob(PROGRESS_KEY)?
            .map(|raw| decode_progress(&raw))
            .transpose()
    }

    async fn save_progress(&self, progress: &UserProgress) -> Result<(), StorageError> {
        let encoded = encode_progress(progress)?;
        self.put_raw_blob(PROGRESS_KEY, encoded)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub performance: Arc<dyn PerformanceRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let performance: Arc<dyn PerformanceRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            performance,
            progress,
        }
    }
}
