use std::sync::Arc;

use tracing::info;

use quiz_core::model::{AchievementThresholds, UnlockedAchievement, UserProgress, check_score};
use quiz_core::time::Clock;
use storage::repository::ProgressRepository;

use crate::error::ProgressError;

/// Result of folding one quiz into learner progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub progress: UserProgress,
    /// Achievements unlocked by this quiz, empty if none.
    pub unlocked: Vec<UnlockedAchievement>,
}

/// Maintains the learner-wide streak, average and achievements.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    repo: Arc<dyn ProgressRepository>,
    thresholds: AchievementThresholds,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            repo,
            thresholds: AchievementThresholds::default(),
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: AchievementThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Load persisted progress (or an empty record if none exists).
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` on storage failures.
    pub async fn load(&self) -> Result<UserProgress, ProgressError> {
        Ok(self.repo.get_progress().await?.unwrap_or_default())
    }

    /// Apply a completed quiz, unlock any newly earned achievements, and persist.
    ///
    /// Achievements are evaluated against the progress *after* this quiz, so the
    /// third passing quiz in a row is the one that unlocks the streak award.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidScore` for a non-finite score and
    /// `ProgressError::Storage` if progress cannot be loaded or saved.
    pub async fn update_progress(
        &self,
        score: f64,
        time_left_secs: u32,
    ) -> Result<ProgressUpdate, ProgressError> {
        let score = check_score(score)?;
        let mut progress = self.load().await?;
        progress.apply_quiz(score);

        let now = self.clock.now();
        let mut unlocked = Vec::new();
        for kind in self.thresholds.evaluate(&progress, score, time_left_secs) {
            let achievement = UnlockedAchievement::new(kind, now);
            if progress.unlock(achievement.clone()) {
                info!(title = achievement.achievement().title, "achievement unlocked");
                unlocked.push(achievement);
            }
        }

        self.repo.save_progress(&progress).await?;
        Ok(ProgressUpdate { progress, unlocked })
    }
}
