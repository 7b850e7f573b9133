//! Difficulty levels and the search limits they resolve to.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ChessError;
use crate::search::iterative_deepening::SearchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Fixed search limits for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchProfile {
    pub max_depth: u8,
    pub time_budget: Duration,
    /// Probability of replacing the searched move with a uniformly random
    /// legal move.
    pub imperfection: f64,
}

impl SearchProfile {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            time_budget: Some(self.time_budget),
            ..SearchConfig::default()
        }
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn profile(self) -> SearchProfile {
        match self {
            Difficulty::Easy => SearchProfile {
                max_depth: 2,
                time_budget: Duration::from_millis(500),
                imperfection: 0.3,
            },
            Difficulty::Medium => SearchProfile {
                max_depth: 4,
                time_budget: Duration::from_millis(1_500),
                imperfection: 0.0,
            },
            Difficulty::Hard => SearchProfile {
                max_depth: 6,
                time_budget: Duration::from_millis(3_000),
                imperfection: 0.0,
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChessError::parse(format!("unknown difficulty: {s:?}")))
    }
}
