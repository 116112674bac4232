//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::ScoreError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `PerformanceTracker`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PerformanceError {
    #[error(transparent)]
    InvalidScore(#[from] ScoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    InvalidScore(#[from] ScoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizCompletion`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizCompletionError {
    #[error(transparent)]
    Performance(#[from] PerformanceError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted by `RecommendationClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecommendationError {
    #[error("recommendation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
}
