use crate::model::{AchievementKind, UnlockedAchievement};

/// Minimum score that counts as a pass and keeps the streak alive.
pub const PASSING_SCORE: f64 = 70.0;

/// Learner-wide progress across every topic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProgress {
    streak: u32,
    total_quizzes: u32,
    average_score: f64,
    achievements: Vec<UnlockedAchievement>,
}

impl UserProgress {
    #[must_use]
    pub fn from_persisted(
        streak: u32,
        total_quizzes: u32,
        average_score: f64,
        achievements: Vec<UnlockedAchievement>,
    ) -> Self {
        Self {
            streak,
            total_quizzes,
            average_score,
            achievements,
        }
    }

    /// Fold one completed quiz into the progress record.
    ///
    /// A passing score extends the streak; anything lower resets it.
    pub fn apply_quiz(&mut self, score: f64) {
        self.streak = if score >= PASSING_SCORE {
            self.streak.saturating_add(1)
        } else {
            0
        };
        let previous = f64::from(self.total_quizzes);
        self.average_score = (self.average_score * previous + score) / (previous + 1.0);
        self.total_quizzes = self.total_quizzes.saturating_add(1);
    }

    #[must_use]
    pub fn after_quiz(mut self, score: f64) -> Self {
        self.apply_quiz(score);
        self
    }

    /// Record an unlock. Returns `false` if the kind was already held.
    pub fn unlock(&mut self, unlocked: UnlockedAchievement) -> bool {
        if self.has_achievement(unlocked.kind) {
            return false;
        }
        self.achievements.push(unlocked);
        true
    }

    #[must_use]
    pub fn has_achievement(&self, kind: AchievementKind) -> bool {
        self.achievements.iter().any(|a| a.kind == kind)
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn total_quizzes(&self) -> u32 {
        self.total_quizzes
    }

    #[must_use]
    pub fn average_score(&self) -> f64 {
        self.average_score
    }

    #[must_use]
    pub fn achievements(&self) -> &[UnlockedAchievement] {
        &self.achievements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn passing_scores_extend_streak() {
        let progress = UserProgress::default()
            .after_quiz(70.0)
            .after_quiz(100.0);
        assert_eq!(progress.streak(), 2);
        assert_eq!(progress.total_quizzes(), 2);
    }

    #[test]
    fn failing_score_resets_streak() {
        let progress = UserProgress::default()
            .after_quiz(80.0)
            .after_quiz(80.0)
            .after_quiz(69.9);
        assert_eq!(progress.streak(), 0);
        assert_eq!(progress.total_quizzes(), 3);
    }

    #[test]
    fn average_is_running_mean() {
        let progress = UserProgress::default()
            .after_quiz(60.0)
            .after_quiz(90.0)
            .after_quiz(30.0);
        assert!((progress.average_score() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn unlock_is_idempotent_per_kind() {
        let mut progress = UserProgress::default();
        let now = fixed_now();
        assert!(progress.unlock(UnlockedAchievement::new(AchievementKind::Speed, now)));
        assert!(!progress.unlock(UnlockedAchievement::new(AchievementKind::Speed, now)));
        assert_eq!(progress.achievements().len(), 1);
    }
}
