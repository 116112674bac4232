use async_trait::async_trait;
use quiz_core::model::{TopicId, TopicPerformance};
use tracing::debug;

use super::SqliteRepository;
use super::kv::{connection_error, fetch_blob, store_blob};
use crate::blob::{
    PERFORMANCE_KEY, TopicPerformanceRecord, decode_performance, encode_performance,
    performance_entries,
};
use crate::repository::{PerformanceRepository, StorageError};

#[async_trait]
impl PerformanceRepository for SqliteRepository {
    async fn get_performance(
        &self,
        topic: &TopicId,
    ) -> Result<Option<TopicPerformance>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(connection_error)?;
        let raw = fetch_blob(&mut conn, PERFORMANCE_KEY).await?;
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
        let mut tx = self.pool.begin().await.map_err(connection_error)?;

        let raw = fetch_blob(&mut tx, PERFORMANCE_KEY).await?;
        let mut table = decode_performance(raw.as_deref())?;
        table.insert(
            topic.as_str().to_owned(),
            TopicPerformanceRecord::from_performance(performance),
        );
        let encoded = encode_performance(&table)?;
        store_blob(&mut tx, PERFORMANCE_KEY, &encoded).await?;

        tx.commit().await.map_err(connection_error)?;
        debug!(topic = %topic, topics = table.len(), "wrote performance table");
        Ok(())
    }

    async fn list_performance(&self) -> Result<Vec<(TopicId, TopicPerformance)>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(connection_error)?;
        let raw = fetch_blob(&mut conn, PERFORMANCE_KEY).await?;
        performance_entries(decode_performance(raw.as_deref())?)
    }
}
