mod achievement;
mod api_settings;
mod difficulty;
mod ids;
mod performance;
mod progress;
mod recommendation;

pub use achievement::{Achievement, AchievementKind, AchievementThresholds, UnlockedAchievement};
pub use api_settings::{ApiSettings, ApiSettingsDraft, ApiSettingsError};
pub use difficulty::{Difficulty, Direction, ParseDifficultyError};
pub use ids::{CategoryId, ParseIdError, TopicId, TopicIdError, UserId};
pub use performance::{ScoreError, TopicPerformance, check_score};
pub use progress::{PASSING_SCORE, UserProgress};
pub use recommendation::{ContentRecommendation, DifficultyRecommendation, RecommendationKind};
