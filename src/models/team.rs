//! Team and TeamStats.

use crate::error::CompetitionError;
use crate::models::competition::CompetitionId;
use crate::models::game::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Points awarded for a win.
pub const POINTS_FOR_WIN: u32 = 2;
/// Points awarded for a draw.
pub const POINTS_FOR_DRAW: u32 = 1;

/// Aggregate results of one team, always rebuilt from match history.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub points: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    /// Always `goals_for - goals_against`.
    pub goal_difference: i64,
}

impl TeamStats {
    /// Matches played so far.
    pub fn played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// Record one match from this team's point of view.
    ///
    /// `goals` is `(scored, conceded)` when the match carried a score. Fails
    /// without touching `self` if a goal total would overflow.
    pub fn record(
        &mut self,
        outcome: TeamOutcome,
        goals: Option<(u32, u32)>,
    ) -> Result<(), CompetitionError> {
        let (goals_for, goals_against) = match goals {
            Some((scored, conceded)) => self
                .goals_for
                .checked_add(scored)
                .zip(self.goals_against.checked_add(conceded))
                .ok_or_else(|| CompetitionError::InvalidMatch("goal totals overflow".to_string()))?,
            None => (self.goals_for, self.goals_against),
        };
        match outcome {
            TeamOutcome::Win => {
                self.wins += 1;
                self.points += POINTS_FOR_WIN;
            }
            TeamOutcome::Draw => {
                self.draws += 1;
                self.points += POINTS_FOR_DRAW;
            }
            TeamOutcome::Loss => self.losses += 1,
        }
        self.goals_for = goals_for;
        self.goals_against = goals_against;
        self.goal_difference = i64::from(goals_for) - i64::from(goals_against);
        Ok(())
    }
}

/// Result of a match for a single team.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TeamOutcome {
    Win,
    Draw,
    Loss,
}

impl TeamOutcome {
    /// Split a match outcome into (home, away) team outcomes.
    pub fn split(outcome: Outcome) -> (TeamOutcome, TeamOutcome) {
        match outcome {
            Outcome::HomeWin => (TeamOutcome::Win, TeamOutcome::Loss),
            Outcome::AwayWin => (TeamOutcome::Loss, TeamOutcome::Win),
            Outcome::Draw => (TeamOutcome::Draw, TeamOutcome::Draw),
        }
    }
}

/// A team registered in one competition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub competition_id: CompetitionId,
    pub name: String,
    pub institution: String,
    #[serde(flatten)]
    pub stats: TeamStats,
    /// Rank in the classification; `None` until standings are computed.
    pub position: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a team with zeroed stats.
    pub fn new(
        competition_id: CompetitionId,
        name: impl Into<String>,
        institution: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            competition_id,
            name: name.into(),
            institution: institution.into(),
            stats: TeamStats::default(),
            position: None,
            created_at: Utc::now(),
        }
    }
}
