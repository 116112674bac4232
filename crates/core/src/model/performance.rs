use thiserror::Error;

use crate::model::Difficulty;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("score must be a finite number, got {0}")]
    NonFinite(f64),
}

/// Accept a reported quiz score.
///
/// Any finite value passes, including values outside `[0, 100]`. Infinite and
/// NaN scores would poison every running average they touch.
///
/// # Errors
///
/// Returns `ScoreError::NonFinite` for infinite or NaN scores.
pub fn check_score(score: f64) -> Result<f64, ScoreError> {
    if !score.is_finite() {
        return Err(ScoreError::NonFinite(score));
    }
    Ok(score)
}

//
// ─── TOPIC PERFORMANCE ─────────────────────────────────────────────────────────
//

/// Historical quiz performance for one topic.
///
/// `average_score` is maintained incrementally as the arithmetic mean of every
/// score recorded so far; the individual scores are not kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicPerformance {
    attempts: u32,
    average_score: f64,
    last_difficulty: Difficulty,
}

impl TopicPerformance {
    /// A record that has not seen any attempt yet.
    ///
    /// This is the lazily created default for a topic: zero attempts, zero
    /// average, and the difficulty that is about to be recorded.
    #[must_use]
    pub fn empty(last_difficulty: Difficulty) -> Self {
        Self {
            attempts: 0,
            average_score: 0.0,
            last_difficulty,
        }
    }

    /// Rehydrate a record from persisted storage.
    #[must_use]
    pub fn from_persisted(attempts: u32, average_score: f64, last_difficulty: Difficulty) -> Self {
        Self {
            attempts,
            average_score,
            last_difficulty,
        }
    }

    /// Fold one completed quiz into the record.
    ///
    /// Scores are accepted as-is; nothing clamps them to `[0, 100]`.
    pub fn record(&mut self, score: f64, difficulty_played: Difficulty) {
        let previous = f64::from(self.attempts);
        self.average_score = (self.average_score * previous + score) / (previous + 1.0);
        self.attempts = self.attempts.saturating_add(1);
        self.last_difficulty = difficulty_played;
    }

    /// Returns a copy with one more attempt folded in.
    #[must_use]
    pub fn recorded(mut self, score: f64, difficulty_played: Difficulty) -> Self {
        self.record(score, difficulty_played);
        self
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn average_score(&self) -> f64 {
        self.average_score
    }

    #[must_use]
    pub fn last_difficulty(&self) -> Difficulty {
        self.last_difficulty
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn first_attempt_sets_average_to_score() {
        let perf = TopicPerformance::empty(Difficulty::Beginner).recorded(80.0, Difficulty::Beginner);
        assert_eq!(perf.attempts(), 1);
        assert!(close(perf.average_score(), 80.0));
    }

    #[test]
    fn attempts_count_every_record() {
        let mut perf = TopicPerformance::empty(Difficulty::Beginner);
        for k in 1..=25_u32 {
            perf.record(50.0, Difficulty::Intermediate);
            assert_eq!(perf.attempts(), k);
        }
    }

    #[test]
    fn average_matches_arithmetic_mean() {
        let scores = [100.0, 35.5, 72.25, 90.0, 0.0, 64.0, 88.8];
        let mut perf = TopicPerformance::empty(Difficulty::Beginner);
        for (i, score) in scores.iter().enumerate() {
            perf.record(*score, Difficulty::Beginner);
            let seen = &scores[..=i];
            #[allow(clippy::cast_precision_loss)]
            let mean = seen.iter().sum::<f64>() / seen.len() as f64;
            assert!(close(perf.average_score(), mean));
        }
    }

    #[test]
    fn last_difficulty_tracks_latest_attempt() {
        let perf = TopicPerformance::empty(Difficulty::Beginner)
            .recorded(70.0, Difficulty::Beginner)
            .recorded(70.0, Difficulty::Advanced);
        assert_eq!(perf.last_difficulty(), Difficulty::Advanced);
    }

    #[test]
    fn out_of_range_scores_pass_through() {
        let perf = TopicPerformance::empty(Difficulty::Beginner)
            .recorded(150.0, Difficulty::Beginner)
            .recorded(-10.0, Difficulty::Beginner);
        assert!(close(perf.average_score(), 70.0));
    }

    #[test]
    fn check_score_rejects_only_non_finite_values() {
        assert_eq!(check_score(-10.0), Ok(-10.0));
        assert_eq!(check_score(150.0), Ok(150.0));
        assert_eq!(
            check_score(f64::INFINITY),
            Err(ScoreError::NonFinite(f64::INFINITY))
        );
        assert!(matches!(
            check_score(f64::NEG_INFINITY),
            Err(ScoreError::NonFinite(_))
        ));
        assert!(matches!(check_score(f64::NAN), Err(ScoreError::NonFinite(_))));
    }
}
