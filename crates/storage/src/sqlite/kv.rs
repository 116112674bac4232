use chrono::Utc;
use sqlx::{Row, SqliteConnection};

use crate::repository::StorageError;

pub(crate) fn connection_error<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Read one named blob.
pub(crate) async fn fetch_blob(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<String>, StorageError> {
    let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(connection_error)?;

    row.map(|row| {
        row.try_get::<String, _>("value")
            .map_err(|e| StorageError::Serialization(e.to_string()))
    })
    .transpose()
}

/// Insert or overwrite one named blob.
pub(crate) async fn store_blob(
    conn: &mut SqliteConnection,
    key: &str,
    value: &str,
) -> Result<(), StorageError> {
    sqlx::query(
        r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
        ",
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(connection_error)?;

    Ok(())
}
