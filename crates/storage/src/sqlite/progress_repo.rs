use async_trait::async_trait;
use quiz_core::model::UserProgress;

use super::SqliteRepository;
use super::kv::{connection_error, fetch_blob, store_blob};
use crate::blob::{PROGRESS_KEY, decode_progress, encode_progress};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self) -> Result<Option<UserProgress>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(connection_error)?;
        fetch_blob(&mut conn, PROGRESS_KEY)
            .await?
            .map(|raw| decode_progress(&raw))
            .transpose()
    }

    async fn save_progress(&self, progress: &UserProgress) -> Result<(), StorageError> {
        let encoded = encode_progress(progress)?;
        let mut conn = self.pool.acquire().await.map_err(connection_error)?;
        store_blob(&mut conn, PROGRESS_KEY, &encoded).await
    }
}
