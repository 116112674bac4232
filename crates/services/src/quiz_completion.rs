use std::sync::Arc;

use quiz_core::model::{
    Difficulty, PASSING_SCORE, TopicId, TopicPerformance, UnlockedAchievement, UserProgress,
};

use crate::error::QuizCompletionError;
use crate::performance_tracker::PerformanceTracker;
use crate::progress_service::ProgressService;

/// Everything the result screen needs after a quiz is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub score: f64,
    pub passed: bool,
    pub performance: TopicPerformance,
    pub progress: UserProgress,
    pub unlocked: Vec<UnlockedAchievement>,
    /// Local recommendation for the next quiz on the same topic.
    pub next_difficulty: Difficulty,
}

/// Handles a submitted quiz: topic history first, then learner progress.
#[derive(Clone)]
pub struct QuizCompletion {
    tracker: Arc<PerformanceTracker>,
    progress: Arc<ProgressService>,
}

impl QuizCompletion {
    #[must_use]
    pub fn new(tracker: Arc<PerformanceTracker>, progress: Arc<ProgressService>) -> Self {
        Self { tracker, progress }
    }

    /// Topic history is committed before learner progress, and the two writes
    /// are not atomic. If saving progress fails the attempt stays recorded, so
    /// retrying the same quiz counts it twice in the topic history.
    ///
    /// # Errors
    ///
    /// Returns `QuizCompletionError` if the score is not finite or either
    /// record cannot be persisted.
    pub async fn complete(
        &self,
        topic: &TopicId,
        difficulty_played: Difficulty,
        score: f64,
        time_left_secs: u32,
    ) -> Result<QuizOutcome, QuizCompletionError> {
        let performance = self
            .tracker
            .record_attempt(topic, score, difficulty_played)
            .await?;
        let update = self.progress.update_progress(score, time_left_secs).await?;
        let next_difficulty = self.tracker.recommend_difficulty(topic).await?;

        Ok(QuizOutcome {
            score,
            passed: score >= PASSING_SCORE,
            performance,
            progress: update.progress,
            unlocked: update.unlocked,
            next_difficulty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::time::fixed_clock;
    use storage::repository::{InMemoryRepository, ProgressRepository, StorageError};

    use crate::error::ProgressError;

    struct BrokenProgress;

    #[async_trait]
    impl ProgressRepository for BrokenProgress {
        async fn get_progress(&self) -> Result<Option<UserProgress>, StorageError> {
            Ok(None)
        }

        async fn save_progress(&self, _progress: &UserProgress) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }
    }

    fn completion(progress: Arc<dyn ProgressRepository>) -> (QuizCompletion, Arc<PerformanceTracker>) {
        let tracker = Arc::new(PerformanceTracker::new(Arc::new(InMemoryRepository::new())));
        let progress = Arc::new(ProgressService::new(fixed_clock(), progress));
        (QuizCompletion::new(Arc::clone(&tracker), progress), tracker)
    }

    #[tokio::test]
    async fn outcome_reports_pass_and_next_difficulty() {
        let (completion, _) = completion(Arc::new(InMemoryRepository::new()));
        let topic = TopicId::new("traits").unwrap();
        let outcome = completion
            .complete(&topic, Difficulty::Beginner, 70.0, 0)
            .await
            .unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.progress.streak(), 1);
        assert_eq!(outcome.next_difficulty, Difficulty::Beginner);
    }

    #[tokio::test]
    async fn progress_failure_leaves_attempt_recorded() {
        let (completion, tracker) = completion(Arc::new(BrokenProgress));
        let topic = TopicId::new("traits").unwrap();

        let err = completion
            .complete(&topic, Difficulty::Beginner, 80.0, 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuizCompletionError::Progress(ProgressError::Storage(_))
        ));

        let perf = tracker.current_performance(&topic).await.unwrap().unwrap();
        assert_eq!(perf.attempts(), 1);
    }

    #[tokio::test]
    async fn non_finite_score_records_nothing() {
        let repo = Arc::new(InMemoryRepository::new());
        let (completion, tracker) = completion(repo.clone());
        let topic = TopicId::new("traits").unwrap();

        let err = completion
            .complete(&topic, Difficulty::Beginner, f64::NAN, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizCompletionError::Performance(_)));
        assert!(tracker.current_performance(&topic).await.unwrap().is_none());
        assert!(repo.get_progress().await.unwrap().is_none());
    }
}
