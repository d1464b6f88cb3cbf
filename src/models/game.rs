//! Match (game), Outcome, Phase and MatchStatus.

use crate::models::competition::CompetitionId;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Symbolic result of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "team1_win")]
    HomeWin,
    #[serde(rename = "team2_win")]
    AwayWin,
    #[serde(rename = "draw")]
    Draw,
}

impl Outcome {
    pub fn from_scores(home: u32, away: u32) -> Self {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

/// Stage of the competition this match belongs to. Declaration order is display order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Group,
    Semifinal,
    ThirdPlace,
    Final,
}

impl Phase {
    /// Knockout phases need a winner.
    pub fn is_knockout(self) -> bool {
        !matches!(self, Phase::Group)
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(Phase::Group),
            "semifinal" => Ok(Phase::Semifinal),
            "third_place" => Ok(Phase::ThirdPlace),
            "final" => Ok(Phase::Final),
            other => Err(format!("Unknown phase: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A pairing produced by the bracket generator, not yet stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSpec {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub phase: Phase,
    pub round: Option<u32>,
}

/// A single match between two teams of one competition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: MatchId,
    pub competition_id: CompetitionId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub phase: Phase,
    pub round: Option<u32>,
    pub status: MatchStatus,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    /// Symbolic result; derived from the score when one is present.
    pub result: Option<Outcome>,
    pub match_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GameMatch {
    pub fn new(competition_id: CompetitionId, spec: MatchSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            competition_id,
            home_team_id: spec.home_team_id,
            away_team_id: spec.away_team_id,
            phase: spec.phase,
            round: spec.round,
            status: MatchStatus::Scheduled,
            home_score: None,
            away_score: None,
            result: None,
            match_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Outcome of the match: the score wins over the symbolic tag when both exist.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.scores() {
            Some((home, away)) => Some(Outcome::from_scores(home, away)),
            None => self.result,
        }
    }

    /// `(home, away)` when both scores are set.
    pub fn scores(&self) -> Option<(u32, u32)> {
        self.home_score.zip(self.away_score)
    }

    /// Whether this match is between `a` and `b`, in either order.
    pub fn is_between(&self, a: TeamId, b: TeamId) -> bool {
        (self.home_team_id == a && self.away_team_id == b)
            || (self.home_team_id == b && self.away_team_id == a)
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// Winner and loser of a decided match.
    pub fn winner_and_loser(&self) -> Option<(TeamId, TeamId)> {
        match self.outcome()? {
            Outcome::HomeWin => Some((self.home_team_id, self.away_team_id)),
            Outcome::AwayWin => Some((self.away_team_id, self.home_team_id)),
            Outcome::Draw => None,
        }
    }
}
