//! Team registration and management.

use crate::error::CompetitionError;
use crate::models::{CompetitionId, Player, Team, TeamId};
use crate::service::classification::recalculate;
use crate::service::players::{validate_participant, NewParticipant};
use crate::store::Store;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub name: String,
    pub institution: String,
    pub competition_id: CompetitionId,
    #[serde(default)]
    pub participants: Vec<NewParticipant>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub institution: Option<String>,
}

/// A team with its registered players.
#[derive(Clone, Debug, Serialize)]
pub struct TeamWithPlayers {
    #[serde(flatten)]
    pub team: Team,
    pub players: Vec<Player>,
}

pub(crate) fn with_players(store: &Store, team: Team) -> TeamWithPlayers {
    let players = store.players_of(team.id);
    TeamWithPlayers { team, players }
}

/// Register a team (and optionally its participants) in a competition.
///
/// Team names are unique per competition (case-insensitive); the competition's
/// `maxTeams` and `maxParticipantsPerTeam` limits apply.
pub fn create_team(store: &mut Store, input: NewTeam) -> Result<TeamWithPlayers, CompetitionError> {
    let name = input.name.trim();
    let institution = input.institution.trim();
    if name.is_empty() || institution.is_empty() {
        return Err(CompetitionError::validation(
            "Team name and institution are required",
        ));
    }
    for p in &input.participants {
        validate_participant(p)?;
    }
    let competition = store.competition(input.competition_id)?;
    let (max_teams, max_participants) =
        (competition.max_teams, competition.max_participants_per_team);

    ensure_unique_name(store, input.competition_id, name, None)?;
    let team_count = store
        .teams
        .iter()
        .filter(|t| t.competition_id == input.competition_id)
        .count();
    if team_count >= max_teams as usize {
        return Err(CompetitionError::TeamLimitReached { max: max_teams });
    }
    if input.participants.len() > max_participants as usize {
        return Err(CompetitionError::ParticipantLimitReached {
            max: max_participants,
        });
    }

    let team = Team::new(input.competition_id, name, institution);
    let team_id = team.id;
    store.teams.push(team);
    for p in input.participants {
        store
            .players
            .push(Player::new(team_id, p.name.trim(), p.email));
    }
    recalculate(store, input.competition_id)?;
    log::info!("Registered team {} in competition {}", team_id, input.competition_id);
    let team = store.team(team_id)?.clone();
    Ok(with_players(store, team))
}

/// All teams, newest first.
pub fn list_teams(store: &Store) -> Vec<TeamWithPlayers> {
    store
        .teams
        .iter()
        .rev()
        .cloned()
        .map(|t| with_players(store, t))
        .collect()
}

/// Teams of a competition by points, then wins.
pub fn teams_by_competition(
    store: &Store,
    competition_id: CompetitionId,
) -> Result<Vec<Team>, CompetitionError> {
    store.competition(competition_id)?;
    let mut teams = store.teams_in(competition_id);
    teams.sort_by(|a, b| {
        b.stats
            .points
            .cmp(&a.stats.points)
            .then(b.stats.wins.cmp(&a.stats.wins))
    });
    Ok(teams)
}

pub fn get_team(store: &Store, id: TeamId) -> Result<TeamWithPlayers, CompetitionError> {
    let team = store.team(id)?.clone();
    Ok(with_players(store, team))
}

pub fn update_team(
    store: &mut Store,
    id: TeamId,
    input: UpdateTeam,
) -> Result<TeamWithPlayers, CompetitionError> {
    let competition_id = store.team(id)?.competition_id;
    if let Some(name) = &input.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(CompetitionError::validation("Team name is required"));
        }
        ensure_unique_name(store, competition_id, name, Some(id))?;
    }
    let team = store.team_mut(id)?;
    if let Some(name) = input.name {
        team.name = name.trim().to_string();
    }
    if let Some(institution) = input.institution {
        let institution = institution.trim();
        if institution.is_empty() {
            return Err(CompetitionError::validation("Institution is required"));
        }
        team.institution = institution.to_string();
    }
    // standings rows carry the team name
    recalculate(store, competition_id)?;
    get_team(store, id)
}

/// Delete a team with its players and every match it takes part in, then
/// rebuild the standings without them.
pub fn delete_team(store: &mut Store, id: TeamId) -> Result<(), CompetitionError> {
    let competition_id = store.team(id)?.competition_id;
    store.players.retain(|p| p.team_id != id);
    store.matches.retain(|m| !m.involves(id));
    store.teams.retain(|t| t.id != id);
    recalculate(store, competition_id)?;
    log::info!("Deleted team {} from competition {}", id, competition_id);
    Ok(())
}

fn ensure_unique_name(
    store: &Store,
    competition_id: CompetitionId,
    name: &str,
    except: Option<TeamId>,
) -> Result<(), CompetitionError> {
    let is_duplicate = store
        .teams
        .iter()
        .filter(|t| t.competition_id == competition_id && Some(t.id) != except)
        .any(|t| t.name.eq_ignore_ascii_case(name));
    if is_duplicate {
        return Err(CompetitionError::DuplicateTeamName);
    }
    Ok(())
}
