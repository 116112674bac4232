use std::sync::Arc;

use tracing::{debug, warn};

use quiz_core::model::{CategoryId, Difficulty, DifficultyRecommendation, TopicId};

use crate::error::PerformanceError;
use crate::performance_tracker::PerformanceTracker;
use crate::recommendation_client::DifficultyRecommender;

/// Remote suggestions override the local ladder only above this confidence.
pub const REMOTE_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Where the chosen difficulty came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultySource {
    Local,
    Remote,
    Manual,
}

/// Difficulty picked for the next quiz, with the remote suggestion if one was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultySelection {
    pub difficulty: Difficulty,
    pub source: DifficultySource,
    pub remote: Option<DifficultyRecommendation>,
}

impl DifficultySelection {
    /// Replace the chosen level with one picked by the learner.
    #[must_use]
    pub fn overridden(self, difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            source: DifficultySource::Manual,
            remote: self.remote,
        }
    }
}

/// Merge the local recommendation with an optional remote one.
#[must_use]
pub fn reconcile(
    local: Difficulty,
    remote: Option<&DifficultyRecommendation>,
    threshold: f64,
) -> (Difficulty, DifficultySource) {
    match remote {
        Some(rec) if rec.confidence > threshold => (rec.recommended_difficulty, DifficultySource::Remote),
        _ => (local, DifficultySource::Local),
    }
}

/// Chooses the difficulty of the next quiz before it is fetched.
#[derive(Clone)]
pub struct DifficultyFilter {
    tracker: Arc<PerformanceTracker>,
    recommender: Option<Arc<dyn DifficultyRecommender>>,
    threshold: f64,
}

impl DifficultyFilter {
    #[must_use]
    pub fn new(
        tracker: Arc<PerformanceTracker>,
        recommender: Option<Arc<dyn DifficultyRecommender>>,
    ) -> Self {
        Self {
            tracker,
            recommender,
            threshold: REMOTE_CONFIDENCE_THRESHOLD,
        }
    }

    /// Pick the difficulty for the next quiz on `topic`.
    ///
    /// When a category is given and a recommender is configured, its
    /// suggestion is fetched and wins if confident enough. Remote failures are
    /// logged and the local recommendation is used.
    ///
    /// # Errors
    ///
    /// Returns `PerformanceError` if local history cannot be read.
    pub async fn resolve(
        &self,
        category: Option<CategoryId>,
        topic: &TopicId,
    ) -> Result<DifficultySelection, PerformanceError> {
        let local = self.tracker.recommend_difficulty(topic).await?;

        let remote = match (category, self.recommender.as_ref()) {
            (Some(category), Some(recommender)) => {
                match recommender.difficulty_recommendation(category).await {
                    Ok(rec) => Some(rec),
                    Err(err) => {
                        warn!(%category, error = %err, "remote difficulty recommendation failed, using local");
                        None
                    }
                }
            }
            _ => None,
        };

        let (difficulty, source) = reconcile(local, remote.as_ref(), self.threshold);
        debug!(topic = %topic, %difficulty, ?source, "resolved quiz difficulty");
        Ok(DifficultySelection {
            difficulty,
            source,
            remote,
        })
    }
}
