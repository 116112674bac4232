//! JSON layout of the persisted blobs.
//!
//! Each table is stored as one named value in a key-value store and is always
//! read whole and written whole. Field names are camelCase so blobs stay
//! compatible with the layout written by the web client.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AchievementKind, Difficulty, TopicId, TopicPerformance, UnlockedAchievement, UserProgress,
};

use crate::repository::StorageError;

/// Key of the per-topic performance table.
pub const PERFORMANCE_KEY: &str = "topicPerformance";
/// Key of the learner-wide progress record.
pub const PROGRESS_KEY: &str = "userProgress";

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

// serde_json writes non-finite floats as `null`, which then fails to decode.
fn ensure_finite(what: &str, value: f64) -> Result<(), StorageError> {
    if !value.is_finite() {
        return Err(StorageError::Serialization(format!(
            "{what} must be finite, got {value}"
        )));
    }
    Ok(())
}

//
// ─── TOPIC PERFORMANCE ─────────────────────────────────────────────────────────
//

/// Persisted shape of a single topic's record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicPerformanceRecord {
    pub attempts: u32,
    pub average_score: f64,
    pub last_difficulty: Difficulty,
}

impl TopicPerformanceRecord {
    #[must_use]
    pub fn from_performance(perf: &TopicPerformance) -> Self {
        Self {
            attempts: perf.attempts(),
            average_score: perf.average_score(),
            last_difficulty: perf.last_difficulty(),
        }
    }

    #[must_use]
    pub fn into_performance(self) -> TopicPerformance {
        TopicPerformance::from_persisted(self.attempts, self.average_score, self.last_difficulty)
    }
}

/// The whole performance table, keyed by topic id.
pub type PerformanceTable = BTreeMap<String, TopicPerformanceRecord>;

/// Decode the performance blob. A missing blob is an empty table.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the blob is not valid JSON for the table.
pub fn decode_performance(raw: Option<&str>) -> Result<PerformanceTable, StorageError> {
    match raw {
        Some(raw) => serde_json::from_str(raw).map_err(ser),
        None => Ok(PerformanceTable::new()),
    }
}

/// # Errors
///
/// Returns `StorageError::Serialization` if an average is not finite, so a
/// table that could not be read back is never written.
pub fn encode_performance(table: &PerformanceTable) -> Result<String, StorageError> {
    for (topic, record) in table {
        ensure_finite(&format!("average score of topic {topic}"), record.average_score)?;
    }
    serde_json::to_string(table).map_err(ser)
}

/// Convert table entries back into domain values.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if a stored key is not a valid topic id.
pub fn performance_entries(
    table: PerformanceTable,
) -> Result<Vec<(TopicId, TopicPerformance)>, StorageError> {
    table
        .into_iter()
        .map(|(key, record)| Ok((TopicId::new(key).map_err(ser)?, record.into_performance())))
        .collect()
}

//
// ─── USER PROGRESS ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRecord {
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    pub title: String,
    pub description: String,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgressRecord {
    pub streak: u32,
    pub total_quizzes: u32,
    pub average_score: f64,
    #[serde(default)]
    pub achievements: Vec<AchievementRecord>,
}

impl UserProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &UserProgress) -> Self {
        Self {
            streak: progress.streak(),
            total_quizzes: progress.total_quizzes(),
            average_score: progress.average_score(),
            achievements: progress
                .achievements()
                .iter()
                .map(|unlocked| {
                    let achievement = unlocked.achievement();
                    AchievementRecord {
                        kind: unlocked.kind,
                        title: achievement.title.to_owned(),
                        description: achievement.description.to_owned(),
                        unlocked_at: unlocked.unlocked_at,
                    }
                })
                .collect(),
        }
    }

    /// Titles and descriptions are presentation data and are rebuilt from the kind.
    #[must_use]
    pub fn into_progress(self) -> UserProgress {
        let mut achievements: Vec<UnlockedAchievement> = Vec::with_capacity(self.achievements.len());
        for record in self.achievements {
            if achievements.iter().all(|a| a.kind != record.kind) {
                achievements.push(UnlockedAchievement::new(record.kind, record.unlocked_at));
            }
        }
        UserProgress::from_persisted(
            self.streak,
            self.total_quizzes,
            self.average_score,
            achievements,
        )
    }
}

/// # Errors
///
/// Returns `StorageError::Serialization` if the blob is not a valid progress record.
pub fn decode_progress(raw: &str) -> Result<UserProgress, StorageError> {
    serde_json::from_str::<UserProgressRecord>(raw)
        .map(UserProgressRecord::into_progress)
        .map_err(ser)
}

/// # Errors
///
/// Returns `StorageError::Serialization` if the average is not finite or the
/// record cannot be represented in JSON.
pub fn encode_progress(progress: &UserProgress) -> Result<String, StorageError> {
    ensure_finite("progress average score", progress.average_score())?;
    serde_json::to_string(&UserProgressRecord::from_progress(progress)).map_err(ser)
}
