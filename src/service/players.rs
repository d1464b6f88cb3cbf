//! Players (team participants).

use crate::error::CompetitionError;
use crate::models::{Player, PlayerId, TeamId};
use crate::store::Store;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParticipant {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `POST /players`: a participant plus the team to join.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub team_id: TeamId,
    #[serde(flatten)]
    pub participant: NewParticipant,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayer {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Move the player to another team of the same competition.
    pub team_id: Option<TeamId>,
}

pub(crate) fn validate_participant(p: &NewParticipant) -> Result<(), CompetitionError> {
    if p.name.trim().is_empty() {
        return Err(CompetitionError::validation("Participant name is required"));
    }
    Ok(())
}

/// Add a participant to a team, respecting the competition's per-team limit.
pub fn add_participant(
    store: &mut Store,
    team_id: TeamId,
    input: NewParticipant,
) -> Result<Player, CompetitionError> {
    validate_participant(&input)?;
    ensure_room(store, team_id)?;
    let player = Player::new(team_id, input.name.trim(), input.email);
    store.players.push(player.clone());
    Ok(player)
}

/// Participants of a team by name.
pub fn list_participants(store: &Store, team_id: TeamId) -> Result<Vec<Player>, CompetitionError> {
    store.team(team_id)?;
    let mut players = store.players_of(team_id);
    players.sort_by_key(|p| p.name.to_lowercase());
    Ok(players)
}

/// Update a participant that must belong to `team_id`.
pub fn update_participant(
    store: &mut Store,
    team_id: TeamId,
    player_id: PlayerId,
    input: UpdatePlayer,
) -> Result<Player, CompetitionError> {
    store.team(team_id)?;
    if store.player(player_id)?.team_id != team_id {
        return Err(CompetitionError::not_found("Player", player_id));
    }
    update_player(store, player_id, input)
}

/// Remove a participant that must belong to `team_id`.
pub fn remove_participant(
    store: &mut Store,
    team_id: TeamId,
    player_id: PlayerId,
) -> Result<(), CompetitionError> {
    store.team(team_id)?;
    if store.player(player_id)?.team_id != team_id {
        return Err(CompetitionError::not_found("Player", player_id));
    }
    delete_player(store, player_id)
}

pub fn create_player(store: &mut Store, input: NewPlayer) -> Result<Player, CompetitionError> {
    add_participant(store, input.team_id, input.participant)
}

/// Players of a team in registration order.
pub fn players_by_team(store: &Store, team_id: TeamId) -> Result<Vec<Player>, CompetitionError> {
    store.team(team_id)?;
    Ok(store.players_of(team_id))
}

pub fn get_player(store: &Store, id: PlayerId) -> Result<Player, CompetitionError> {
    store.player(id).cloned()
}

pub fn update_player(
    store: &mut Store,
    id: PlayerId,
    input: UpdatePlayer,
) -> Result<Player, CompetitionError> {
    let current_team = store.player(id)?.team_id;
    if let Some(team_id) = input.team_id.filter(|t| *t != current_team) {
        let from = store.team(current_team)?.competition_id;
        if store.team(team_id)?.competition_id != from {
            return Err(CompetitionError::validation(
                "Players can only move between teams of the same competition",
            ));
        }
        ensure_room(store, team_id)?;
    }
    let player = store.player_mut(id)?;
    if let Some(name) = input.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(CompetitionError::validation("Participant name is required"));
        }
        player.name = name.to_string();
    }
    if let Some(email) = input.email {
        player.email = Some(email).filter(|e| !e.trim().is_empty());
    }
    if let Some(team_id) = input.team_id {
        player.team_id = team_id;
    }
    Ok(player.clone())
}

pub fn delete_player(store: &mut Store, id: PlayerId) -> Result<(), CompetitionError> {
    store.player(id)?;
    store.players.retain(|p| p.id != id);
    Ok(())
}

fn ensure_room(store: &Store, team_id: TeamId) -> Result<(), CompetitionError> {
    let team = store.team(team_id)?;
    let max = store.competition(team.competition_id)?.max_participants_per_team;
    if store.players.iter().filter(|p| p.team_id == team_id).count() >= max as usize {
        return Err(CompetitionError::ParticipantLimitReached { max });
    }
    Ok(())
}
