use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

/// Difficulty suggestion produced by the remote recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyRecommendation {
    pub current_difficulty: Difficulty,
    pub recommended_difficulty: Difficulty,
    /// Certainty of the recommender in `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Nlp,
    Collaborative,
    Prerequisite,
}

/// A content item suggested by the remote recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecommendation {
    pub id: u64,
    pub content_id: u64,
    pub title: String,
    pub difficulty: Difficulty,
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
}
