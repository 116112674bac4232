use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::UserProgress;

/// The three achievement families a quiz can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    Streak,
    Score,
    Speed,
}

impl AchievementKind {
    pub const ALL: [AchievementKind; 3] = [
        AchievementKind::Streak,
        AchievementKind::Score,
        AchievementKind::Speed,
    ];

    #[must_use]
    pub fn achievement(self) -> Achievement {
        match self {
            AchievementKind::Streak => Achievement {
                kind: self,
                title: "On Fire!",
                description: "3 quizzes completed in a row!",
            },
            AchievementKind::Score => Achievement {
                kind: self,
                title: "Excellence",
                description: "Scored 90% or higher!",
            },
            AchievementKind::Speed => Achievement {
                kind: self,
                title: "Speed Demon",
                description: "Completed with plenty of time to spare!",
            },
        }
    }
}

/// Static presentation data for an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub title: &'static str,
    pub description: &'static str,
}

/// An achievement the learner has earned, with the moment it was earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedAchievement {
    pub kind: AchievementKind,
    pub unlocked_at: DateTime<Utc>,
}

impl UnlockedAchievement {
    #[must_use]
    pub fn new(kind: AchievementKind, unlocked_at: DateTime<Utc>) -> Self {
        Self { kind, unlocked_at }
    }

    #[must_use]
    pub fn achievement(&self) -> Achievement {
        self.kind.achievement()
    }
}

/// Unlock thresholds applied after each completed quiz.
///
/// - streak: `progress.streak >= streak`
/// - score: `score >= score`
/// - speed: `time_left_secs > time_left_secs`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AchievementThresholds {
    pub score: f64,
    pub streak: u32,
    pub time_left_secs: u32,
}

impl Default for AchievementThresholds {
    fn default() -> Self {
        Self {
            score: 90.0,
            streak: 3,
            time_left_secs: 15,
        }
    }
}

impl AchievementThresholds {
    /// Kinds whose criteria are met by this quiz, in `AchievementKind::ALL` order.
    ///
    /// `progress` must already include the quiz being evaluated. Kinds the
    /// learner already holds are skipped.
    #[must_use]
    pub fn evaluate(
        &self,
        progress: &UserProgress,
        score: f64,
        time_left_secs: u32,
    ) -> Vec<AchievementKind> {
        AchievementKind::ALL
            .into_iter()
            .filter(|kind| !progress.has_achievement(*kind))
            .filter(|kind| match kind {
                AchievementKind::Streak => progress.streak() >= self.streak,
                AchievementKind::Score => score >= self.score,
                AchievementKind::Speed => time_left_secs > self.time_left_secs,
            })
            .collect()
    }
}
