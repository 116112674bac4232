//! Difficulty ladder used to pick the level of the next quiz on a topic.

use crate::model::{Difficulty, Direction, TopicPerformance};

//
// ─── THRESHOLDS ────────────────────────────────────────────────────────────────
//

/// Attempts required before the ladder moves off `Beginner`.
pub const MIN_ATTEMPTS: u32 = 2;
/// Average strictly above this promotes one level.
pub const PROMOTE_ABOVE: f64 = 90.0;
/// Average strictly below this demotes one level.
pub const DEMOTE_BELOW: f64 = 60.0;

/// Threshold ladder over a topic's performance record.
///
/// The ladder has no hysteresis: it promotes after strong averages, demotes
/// after weak ones, and holds in between. It moves at most one level away from
/// the last difficulty played.
///
/// # Examples
///
/// ```
/// # use quiz_core::model::{Difficulty, TopicPerformance};
/// # use quiz_core::policy::DifficultyPolicy;
/// let perf = TopicPerformance::from_persisted(2, 95.0, Difficulty::Beginner);
/// let next = DifficultyPolicy::default().recommend(Some(&perf));
/// assert_eq!(next, Difficulty::Intermediate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyPolicy {
    pub min_attempts: u32,
    pub promote_above: f64,
    pub demote_below: f64,
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self {
            min_attempts: MIN_ATTEMPTS,
            promote_above: PROMOTE_ABOVE,
            demote_below: DEMOTE_BELOW,
        }
    }
}

impl DifficultyPolicy {
    /// Recommend the next difficulty for a topic.
    ///
    /// Evaluated in order:
    /// 1. no record, or fewer than `min_attempts` → `Beginner`
    /// 2. average above `promote_above` → one step up from the last level
    /// 3. average below `demote_below` → one step down from the last level
    /// 4. otherwise the last level unchanged
    #[must_use]
    pub fn recommend(&self, performance: Option<&TopicPerformance>) -> Difficulty {
        let Some(perf) = performance else {
            return Difficulty::Beginner;
        };
        if perf.attempts() < self.min_attempts {
            return Difficulty::Beginner;
        }

        let last = perf.last_difficulty();
        if perf.average_score() > self.promote_above {
            last.step(Direction::Up)
        } else if perf.average_score() < self.demote_below {
            last.step(Direction::Down)
        } else {
            last
        }
    }
}

/// Recommend with the default thresholds.
#[must_use]
pub fn recommend_difficulty(performance: Option<&TopicPerformance>) -> Difficulty {
    DifficultyPolicy::default().recommend(performance)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
