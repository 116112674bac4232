use std::sync::Arc;

use tracing::{debug, info};

use quiz_core::model::{Difficulty, TopicId, TopicPerformance, check_score};
use quiz_core::policy::DifficultyPolicy;
use storage::repository::PerformanceRepository;

use crate::error::PerformanceError;

/// Tracks per-topic quiz performance and recommends the next difficulty.
#[derive(Clone)]
pub struct PerformanceTracker {
    repo: Arc<dyn PerformanceRepository>,
    policy: DifficultyPolicy,
}

impl PerformanceTracker {
    #[must_use]
    pub fn new(repo: Arc<dyn PerformanceRepository>) -> Self {
        Self {
            repo,
            policy: DifficultyPolicy::default(),
        }
    }

    /// Override the ladder thresholds.
    #[must_use]
    pub fn with_policy(mut self, policy: DifficultyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fold a completed quiz into the topic's record and persist it.
    ///
    /// The record is created on first use. Scores are not range-checked, but
    /// infinite and NaN scores are refused before anything is read or written.
    ///
    /// # Errors
    ///
    /// Returns `PerformanceError::InvalidScore` for a non-finite score and
    /// `PerformanceError::Storage` if the table cannot be read or written.
    pub async fn record_attempt(
        &self,
        topic: &TopicId,
        score: f64,
        difficulty_played: Difficulty,
    ) -> Result<TopicPerformance, PerformanceError> {
        let score = check_score(score)?;
        let current = self
            .repo
            .get_performance(topic)
            .await?
            .unwrap_or_else(|| TopicPerformance::empty(difficulty_played));

        let updated = current.recorded(score, difficulty_played);
        self.repo.put_performance(topic, &updated).await?;

        info!(
            topic = %topic,
            score,
            difficulty = %difficulty_played,
            attempts = updated.attempts(),
            average = updated.average_score(),
            "recorded quiz attempt"
        );
        Ok(updated)
    }

    /// Recommended difficulty for the next quiz on a topic.
    ///
    /// Reading the record has no side effects, so repeated calls without an
    /// intervening `record_attempt` return the same level.
    ///
    /// # Errors
    ///
    /// Returns `PerformanceError::Storage` if the table cannot be read.
    pub async fn recommend_difficulty(&self, topic: &TopicId) -> Result<Difficulty, PerformanceError> {
        let performance = self.repo.get_performance(topic).await?;
        let recommended = self.policy.recommend(performance.as_ref());
        debug!(topic = %topic, %recommended, "local difficulty recommendation");
        Ok(recommended)
    }

    /// # Errors
    ///
    /// Returns `PerformanceError::Storage` if the table cannot be read.
    pub async fn current_performance(
        &self,
        topic: &TopicId,
    ) -> Result<Option<TopicPerformance>, PerformanceError> {
        Ok(self.repo.get_performance(topic).await?)
    }

    /// Every tracked topic, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `PerformanceError::Storage` if the table cannot be read.
    pub async fn all_performance(&self) -> Result<Vec<(TopicId, TopicPerformance)>, PerformanceError> {
        Ok(self.repo.list_performance().await?)
    }
}
