//! Competition manager: library with models, standings/bracket logic, store and REST API.

pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::{CompetitionError, ErrorKind};
pub use logic::{
    check_not_duplicate, generate_round_robin, generate_semifinals,
    generate_third_place_and_final, recompute_standings, semifinal_outcome,
};
pub use models::{
    Classification, Competition, CompetitionId, CompetitionStatus, GameMatch, MatchId, MatchSpec,
    MatchStatus, Outcome, Phase, Player, PlayerId, ScoringMode, Standing, Team, TeamId,
    TeamOutcome, TeamStats,
};
pub use store::{Database, Store};
