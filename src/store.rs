//! In-memory relational store with all-or-nothing transactions.
//!
//! Tables are plain vectors kept in insertion order, so "creation order" is
//! simply index order. A transaction works on a copy of the tables under the
//! write lock and only replaces the live tables when the closure succeeds.

use crate::error::CompetitionError;
use crate::models::{
    Classification, Competition, CompetitionId, GameMatch, MatchId, Player, PlayerId, Team,
    TeamId,
};
use std::sync::RwLock;

/// All tables of the store.
#[derive(Clone, Debug, Default)]
pub struct Store {
    pub competitions: Vec<Competition>,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub matches: Vec<GameMatch>,
    pub classifications: Vec<Classification>,
}

impl Store {
    pub fn competition(&self, id: CompetitionId) -> Result<&Competition, CompetitionError> {
        self.competitions
            .iter()
            .find(|c| c.id == id)
            .ok_or(CompetitionError::not_found("Competition", id))
    }

    pub fn competition_mut(
        &mut self,
        id: CompetitionId,
    ) -> Result<&mut Competition, CompetitionError> {
        self.competitions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CompetitionError::not_found("Competition", id))
    }

    pub fn team(&self, id: TeamId) -> Result<&Team, CompetitionError> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .ok_or(CompetitionError::not_found("Team", id))
    }

    pub fn team_mut(&mut self, id: TeamId) -> Result<&mut Team, CompetitionError> {
        self.teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CompetitionError::not_found("Team", id))
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, CompetitionError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(CompetitionError::not_found("Player", id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, CompetitionError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CompetitionError::not_found("Player", id))
    }

    pub fn game(&self, id: MatchId) -> Result<&GameMatch, CompetitionError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .ok_or(CompetitionError::not_found("Match", id))
    }

    pub fn game_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, CompetitionError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(CompetitionError::not_found("Match", id))
    }

    /// Teams of a competition in registration order.
    pub fn teams_in(&self, competition_id: CompetitionId) -> Vec<Team> {
        self.teams
            .iter()
            .filter(|t| t.competition_id == competition_id)
            .cloned()
            .collect()
    }

    /// Matches of a competition in creation order.
    pub fn matches_in(&self, competition_id: CompetitionId) -> Vec<GameMatch> {
        self.matches
            .iter()
            .filter(|m| m.competition_id == competition_id)
            .cloned()
            .collect()
    }

    pub fn players_of(&self, team_id: TeamId) -> Vec<Player> {
        self.players
            .iter()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect()
    }

    pub fn classification(&self, competition_id: CompetitionId) -> Option<&Classification> {
        self.classifications
            .iter()
            .find(|c| c.competition_id == competition_id)
    }

    /// Insert or replace the classification of a competition.
    pub fn put_classification(&mut self, classification: Classification) {
        match self
            .classifications
            .iter_mut()
            .find(|c| c.competition_id == classification.competition_id)
        {
            Some(existing) => *existing = classification,
            None => self.classifications.push(classification),
        }
    }
}

/// Shared handle to the store, injected into request handlers.
#[derive(Debug, Default)]
pub struct Database {
    tables: RwLock<Store>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Store) -> Self {
        Self {
            tables: RwLock::new(store),
        }
    }

    /// Run a read-only query against a consistent snapshot.
    pub fn read<T>(
        &self,
        f: impl FnOnce(&Store) -> Result<T, CompetitionError>,
    ) -> Result<T, CompetitionError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| CompetitionError::Internal("store lock poisoned".to_string()))?;
        f(&guard)
    }

    /// Run `f` as one transaction: its writes become visible only if it returns `Ok`.
    ///
    /// The write lock is held for the whole closure, so transactions are serialized.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut Store) -> Result<T, CompetitionError>,
    ) -> Result<T, CompetitionError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| CompetitionError::Internal("store lock poisoned".to_string()))?;
        let mut working = guard.clone();
        let value = f(&mut working)?;
        *guard = working;
        Ok(value)
    }
}
