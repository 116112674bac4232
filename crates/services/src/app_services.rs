use std::sync::Arc;

use quiz_core::model::ApiSettings;
use storage::repository::Storage;

use crate::Clock;
use crate::difficulty_filter::DifficultyFilter;
use crate::error::AppServicesError;
use crate::performance_tracker::PerformanceTracker;
use crate::progress_service::ProgressService;
use crate::quiz_completion::QuizCompletion;
use crate::recommendation_client::{DifficultyRecommender, RecommendationClient};

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    tracker: Arc<PerformanceTracker>,
    progress: Arc<ProgressService>,
    difficulty_filter: Arc<DifficultyFilter>,
    quiz_completion: Arc<QuizCompletion>,
    recommendations: Option<Arc<RecommendationClient>>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// Passing `None` for `api` keeps difficulty selection purely local.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the HTTP
    /// client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        api: Option<ApiSettings>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, api)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        api: Option<ApiSettings>,
    ) -> Result<Self, AppServicesError> {
        let recommendations = api
            .map(RecommendationClient::new)
            .transpose()?
            .map(Arc::new);

        let tracker = Arc::new(PerformanceTracker::new(Arc::clone(&storage.performance)));
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.progress)));
        let recommender = recommendations
            .clone()
            .map(|client| client as Arc<dyn DifficultyRecommender>);
        let difficulty_filter = Arc::new(DifficultyFilter::new(Arc::clone(&tracker), recommender));
        let quiz_completion = Arc::new(QuizCompletion::new(
            Arc::clone(&tracker),
            Arc::clone(&progress),
        ));

        Ok(Self {
            tracker,
            progress,
            difficulty_filter,
            quiz_completion,
            recommendations,
        })
    }

    #[must_use]
    pub fn tracker(&self) -> Arc<PerformanceTracker> {
        Arc::clone(&self.tracker)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn difficulty_filter(&self) -> Arc<DifficultyFilter> {
        Arc::clone(&self.difficulty_filter)
    }

    #[must_use]
    pub fn quiz_completion(&self) -> Arc<QuizCompletion> {
        Arc::clone(&self.quiz_completion)
    }

    #[must_use]
    pub fn recommendations(&self) -> Option<Arc<RecommendationClient>> {
        self.recommendations.clone()
    }
}
