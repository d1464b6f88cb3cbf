//! Data structures for competitions: teams, players, matches and standings.

mod classification;
mod competition;
mod game;
mod player;
mod team;

pub use classification::{Classification, Standing};
pub use competition::{Competition, CompetitionId, CompetitionStatus, ScoringMode};
pub use game::{GameMatch, MatchId, MatchSpec, MatchStatus, Outcome, Phase};
pub use player::{Player, PlayerId};
pub use team::{Team, TeamId, TeamOutcome, TeamStats, POINTS_FOR_DRAW, POINTS_FOR_WIN};
