use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty level: {0}")]
pub struct ParseDifficultyError(pub String);

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Three-level quiz difficulty.
///
/// Levels form a linear chain `Beginner ⇄ Intermediate ⇄ Advanced`; the
/// derived ordering follows that chain.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Direction of travel along the difficulty ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Moves one rung along the ladder, saturating at either end.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        match (self, direction) {
            (Difficulty::Beginner, Direction::Up) => Difficulty::Intermediate,
            (Difficulty::Intermediate, Direction::Up) | (Difficulty::Advanced, Direction::Up) => {
                Difficulty::Advanced
            }
            (Difficulty::Advanced, Direction::Down) => Difficulty::Intermediate,
            (Difficulty::Intermediate, Direction::Down) | (Difficulty::Beginner, Direction::Down) => {
                Difficulty::Beginner
            }
        }
    }

    /// Wire/storage name of the level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
