#![forbid(unsafe_code)]

pub mod app_services;
pub mod difficulty_filter;
pub mod error;
pub mod performance_tracker;
pub mod progress_service;
pub mod quiz_completion;
pub mod recommendation_client;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use difficulty_filter::{
    DifficultyFilter, DifficultySelection, DifficultySource, REMOTE_CONFIDENCE_THRESHOLD,
};
pub use error::{
    AppServicesError, PerformanceError, ProgressError, QuizCompletionError, RecommendationError,
};
pub use performance_tracker::PerformanceTracker;
pub use progress_service::{ProgressService, ProgressUpdate};
pub use quiz_completion::{QuizCompletion, QuizOutcome};
pub use recommendation_client::{DifficultyRecommender, RecommendationClient};
