//! Competition CRUD and the views nested under a competition.

use crate::error::CompetitionError;
use crate::models::{
    Competition, CompetitionId, CompetitionStatus, GameMatch, ScoringMode, Standing, TeamId,
};
use crate::service::classification::classification;
use crate::service::teams::{with_players, TeamWithPlayers};
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetition {
    pub name: String,
    pub max_teams: u32,
    #[serde(alias = "maxPlayersPerTeam")]
    pub max_participants_per_team: u32,
    /// Falls back to the server default when omitted.
    #[serde(default)]
    pub scoring_mode: Option<ScoringMode>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompetition {
    pub name: Option<String>,
    pub max_teams: Option<u32>,
    #[serde(alias = "maxPlayersPerTeam")]
    pub max_participants_per_team: Option<u32>,
    pub status: Option<CompetitionStatus>,
}

/// A competition with everything it owns.
#[derive(Clone, Debug, Serialize)]
pub struct CompetitionDetails {
    #[serde(flatten)]
    pub competition: Competition,
    pub teams: Vec<TeamWithPlayers>,
    pub matches: Vec<GameMatch>,
    pub classification: Vec<Standing>,
}

/// Create an active competition. Name must be non-empty, limits non-zero.
pub fn create_competition(
    store: &mut Store,
    input: NewCompetition,
    default_mode: ScoringMode,
) -> Result<Competition, CompetitionError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CompetitionError::validation("Competition name is required"));
    }
    validate_limits(input.max_teams, input.max_participants_per_team)?;
    let competition = Competition::new(
        name,
        input.max_teams,
        input.max_participants_per_team,
        input.scoring_mode.unwrap_or(default_mode),
    );
    log::info!(
        "Created competition {} ({:?} scoring)",
        competition.id,
        competition.scoring_mode
    );
    store.competitions.push(competition.clone());
    Ok(competition)
}

/// All competitions, newest first.
pub fn list_competitions(store: &Store) -> Vec<Competition> {
    store.competitions.iter().rev().cloned().collect()
}

pub fn get_competition(
    store: &Store,
    id: CompetitionId,
) -> Result<CompetitionDetails, CompetitionError> {
    let competition = store.competition(id)?.clone();
    let teams = store
        .teams_in(id)
        .into_iter()
        .map(|t| with_players(store, t))
        .collect();
    Ok(CompetitionDetails {
        competition,
        teams,
        matches: competition_matches(store, id)?,
        classification: classification(store, id)?.rows,
    })
}

/// Apply a partial update. Neither limit may drop below what is already registered.
pub fn update_competition(
    store: &mut Store,
    id: CompetitionId,
    input: UpdateCompetition,
) -> Result<Competition, CompetitionError> {
    let team_ids: Vec<TeamId> = store
        .teams
        .iter()
        .filter(|t| t.competition_id == id)
        .map(|t| t.id)
        .collect();
    let team_count = team_ids.len();
    let largest_roster = team_ids
        .iter()
        .map(|team_id| store.players.iter().filter(|p| p.team_id == *team_id).count())
        .max()
        .unwrap_or(0);
    let competition = store.competition_mut(id)?;
    if let Some(name) = input.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(CompetitionError::validation("Competition name is required"));
        }
        competition.name = name.to_string();
    }
    let max_teams = input.max_teams.unwrap_or(competition.max_teams);
    let max_participants = input
        .max_participants_per_team
        .unwrap_or(competition.max_participants_per_team);
    validate_limits(max_teams, max_participants)?;
    if (max_teams as usize) < team_count {
        return Err(CompetitionError::validation(format!(
            "maxTeams cannot be lower than the {team_count} registered teams"
        )));
    }
    if (max_participants as usize) < largest_roster {
        return Err(CompetitionError::validation(format!(
            "maxParticipantsPerTeam cannot be lower than the {largest_roster} participants of the largest team"
        )));
    }
    competition.max_teams = max_teams;
    competition.max_participants_per_team = max_participants;
    if let Some(status) = input.status {
        competition.status = status;
    }
    competition.touch();
    Ok(competition.clone())
}

/// Delete a competition together with its teams, their players, its matches
/// and its classification.
pub fn delete_competition(store: &mut Store, id: CompetitionId) -> Result<(), CompetitionError> {
    store.competition(id)?;
    let team_ids: HashSet<TeamId> = store
        .teams
        .iter()
        .filter(|t| t.competition_id == id)
        .map(|t| t.id)
        .collect();
    store.players.retain(|p| !team_ids.contains(&p.team_id));
    store.teams.retain(|t| t.competition_id != id);
    store.matches.retain(|m| m.competition_id != id);
    store.classifications.retain(|c| c.competition_id != id);
    store.competitions.retain(|c| c.id != id);
    log::info!(
        "Deleted competition {} with {} team(s)",
        id,
        team_ids.len()
    );
    Ok(())
}

/// Teams of a competition by name.
pub fn competition_teams(
    store: &Store,
    id: CompetitionId,
) -> Result<Vec<TeamWithPlayers>, CompetitionError> {
    store.competition(id)?;
    let mut teams = store.teams_in(id);
    teams.sort_by_key(|t| t.name.to_lowercase());
    Ok(teams.into_iter().map(|t| with_players(store, t)).collect())
}

/// Matches of a competition by phase, then round, then creation.
pub fn competition_matches(
    store: &Store,
    id: CompetitionId,
) -> Result<Vec<GameMatch>, CompetitionError> {
    store.competition(id)?;
    let mut matches = store.matches_in(id);
    matches.sort_by_key(|m| (m.phase, m.round));
    Ok(matches)
}

fn validate_limits(max_teams: u32, max_participants: u32) -> Result<(), CompetitionError> {
    if max_teams == 0 {
        return Err(CompetitionError::validation("maxTeams must be at least 1"));
    }
    if max_participants == 0 {
        return Err(CompetitionError::validation(
            "maxParticipantsPerTeam must be at least 1",
        ));
    }
    Ok(())
}
