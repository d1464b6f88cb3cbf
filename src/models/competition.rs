//! Competition, CompetitionStatus and ScoringMode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competition.
pub type CompetitionId = Uuid;

/// Lifecycle of a competition.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionStatus {
    #[default]
    Active,
    Finished,
    Cancelled,
}

/// How match results are entered for a competition.
///
/// Both modes award 2 points for a win, 1 for a draw and 0 for a loss; only
/// score-based results feed goals for/against.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Results are `homeScore`/`awayScore` pairs.
    #[default]
    ScoreBased,
    /// Results are `team1_win`/`team2_win`/`draw` tags.
    SymbolicResult,
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score_based" | "score" => Ok(ScoringMode::ScoreBased),
            "symbolic_result" | "symbolic" => Ok(ScoringMode::SymbolicResult),
            other => Err(format!("unknown scoring mode: {other}")),
        }
    }
}

/// Root aggregate: owns teams, matches and classification rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub max_teams: u32,
    pub max_participants_per_team: u32,
    pub status: CompetitionStatus,
    pub scoring_mode: ScoringMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Competition {
    /// Create an active competition.
    pub fn new(
        name: impl Into<String>,
        max_teams: u32,
        max_participants_per_team: u32,
        scoring_mode: ScoringMode,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            max_teams,
            max_participants_per_team,
            status: CompetitionStatus::Active,
            scoring_mode,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
