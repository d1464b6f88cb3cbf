//! Matches: creation, results and bracket generation against the store.

use crate::error::CompetitionError;
use crate::logic::{
    check_not_duplicate, generate_round_robin, generate_semifinals,
    generate_third_place_and_final, semifinal_outcome,
};
use crate::models::{
    CompetitionId, GameMatch, MatchId, MatchSpec, MatchStatus, Outcome, Phase, ScoringMode,
    TeamId,
};
use crate::service::classification::recalculate;
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Highest score accepted for one side of a match.
pub const MAX_SCORE: u32 = 999;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub competition_id: CompetitionId,
    #[serde(alias = "team1Id")]
    pub home_team_id: TeamId,
    #[serde(alias = "team2Id")]
    pub away_team_id: TeamId,
    #[serde(default, alias = "matchType")]
    pub phase: Option<Phase>,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub match_date: Option<DateTime<Utc>>,
}

/// Scheduling fields that may change after creation.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatch {
    pub round: Option<u32>,
    pub match_date: Option<DateTime<Utc>>,
}

/// Result submission: a score pair for score-based competitions, a tag for symbolic ones.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultInput {
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub result: Option<Outcome>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    /// Subset of the competition's teams; all teams when omitted.
    pub team_ids: Option<Vec<TeamId>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemifinalRequest {
    /// Top 4 in rank order; taken from the classification when omitted.
    #[serde(alias = "top4Teams")]
    pub top4_teams: Option<Vec<TeamId>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalsRequest {
    pub semifinal_winners: Option<Vec<TeamId>>,
    pub semifinal_losers: Option<Vec<TeamId>>,
}

/// Create a single match after checking both teams and the pair.
pub fn create_match(store: &mut Store, input: NewMatch) -> Result<GameMatch, CompetitionError> {
    store.competition(input.competition_id)?;
    if input.home_team_id == input.away_team_id {
        return Err(CompetitionError::validation(
            "A team cannot play against itself",
        ));
    }
    let spec = MatchSpec {
        home_team_id: input.home_team_id,
        away_team_id: input.away_team_id,
        phase: input.phase.unwrap_or(Phase::Group),
        round: input.round,
    };
    let created = insert_specs(store, input.competition_id, vec![spec])?;
    let game = store.game_mut(created[0].id)?;
    game.match_date = input.match_date;
    Ok(game.clone())
}

/// All matches, newest first.
pub fn list_matches(store: &Store) -> Vec<GameMatch> {
    store.matches.iter().rev().cloned().collect()
}

pub fn get_match(store: &Store, id: MatchId) -> Result<GameMatch, CompetitionError> {
    store.game(id).cloned()
}

/// Matches of one phase in creation order.
pub fn matches_by_phase(
    store: &Store,
    competition_id: CompetitionId,
    phase: Phase,
) -> Result<Vec<GameMatch>, CompetitionError> {
    store.competition(competition_id)?;
    Ok(store
        .matches_in(competition_id)
        .into_iter()
        .filter(|m| m.phase == phase)
        .collect())
}

/// Matches a team plays in, newest first.
pub fn matches_by_team(store: &Store, team_id: TeamId) -> Result<Vec<GameMatch>, CompetitionError> {
    store.team(team_id)?;
    Ok(store
        .matches
        .iter()
        .rev()
        .filter(|m| m.involves(team_id))
        .cloned()
        .collect())
}

pub fn update_match(
    store: &mut Store,
    id: MatchId,
    input: UpdateMatch,
) -> Result<GameMatch, CompetitionError> {
    let game = store.game_mut(id)?;
    if input.round.is_some() {
        game.round = input.round;
    }
    if input.match_date.is_some() {
        game.match_date = input.match_date;
    }
    Ok(game.clone())
}

/// Record a final result, mark the match completed and rebuild the standings.
pub fn submit_result(
    store: &mut Store,
    id: MatchId,
    input: MatchResultInput,
) -> Result<GameMatch, CompetitionError> {
    let competition_id = store.game(id)?.competition_id;
    let mode = store.competition(competition_id)?.scoring_mode;
    let phase = store.game(id)?.phase;

    let (scores, outcome) = match (mode, input.home_score.zip(input.away_score), input.result) {
        (ScoringMode::ScoreBased, Some((home, away)), _) => {
            if home > MAX_SCORE || away > MAX_SCORE {
                return Err(CompetitionError::validation(format!(
                    "Scores must be between 0 and {MAX_SCORE}"
                )));
            }
            (Some((home, away)), Outcome::from_scores(home, away))
        }
        (ScoringMode::ScoreBased, None, _) => {
            return Err(CompetitionError::validation(
                "homeScore and awayScore are required",
            ))
        }
        (ScoringMode::SymbolicResult, _, Some(result)) => (None, result),
        (ScoringMode::SymbolicResult, _, None) => {
            return Err(CompetitionError::validation(
                "result must be team1_win, team2_win or draw",
            ))
        }
    };
    if phase.is_knockout() && outcome == Outcome::Draw {
        return Err(CompetitionError::validation(
            "Knockout matches cannot end in a draw",
        ));
    }

    let game = store.game_mut(id)?;
    game.home_score = scores.map(|(home, _)| home);
    game.away_score = scores.map(|(_, away)| away);
    game.result = Some(outcome);
    game.status = MatchStatus::Completed;
    let game = game.clone();
    recalculate(store, competition_id)?;
    log::info!("Recorded result {:?} for match {}", outcome, id);
    Ok(game)
}

/// Change the status of a match and rebuild the standings.
///
/// A match can only become completed once it carries a result.
pub fn update_status(
    store: &mut Store,
    id: MatchId,
    status: MatchStatus,
) -> Result<GameMatch, CompetitionError> {
    let game = store.game_mut(id)?;
    if status == MatchStatus::Completed && game.outcome().is_none() {
        return Err(CompetitionError::InvalidMatch(
            "cannot complete a match without a result".to_string(),
        ));
    }
    game.status = status;
    let game = game.clone();
    recalculate(store, game.competition_id)?;
    Ok(game)
}

pub fn delete_match(store: &mut Store, id: MatchId) -> Result<(), CompetitionError> {
    let game = store.game(id)?.clone();
    store.matches.retain(|m| m.id != id);
    if game.is_completed() {
        recalculate(store, game.competition_id)?;
    }
    Ok(())
}

/// Round robin over the given teams, or over all teams of the competition in
/// registration order.
pub fn generate_group_matches(
    store: &mut Store,
    competition_id: CompetitionId,
    request: GroupRequest,
) -> Result<Vec<GameMatch>, CompetitionError> {
    store.competition(competition_id)?;
    let team_ids = match request.team_ids {
        Some(ids) => ids,
        None => store.teams_in(competition_id).iter().map(|t| t.id).collect(),
    };
    let specs = generate_round_robin(&team_ids)?;
    let created = insert_specs(store, competition_id, specs)?;
    log::info!(
        "Generated {} group matches for competition {}",
        created.len(),
        competition_id
    );
    Ok(created)
}

/// Semifinals for the top 4 teams: 1st vs 4th and 2nd vs 3rd.
pub fn generate_semifinal_matches(
    store: &mut Store,
    competition_id: CompetitionId,
    request: SemifinalRequest,
) -> Result<Vec<GameMatch>, CompetitionError> {
    store.competition(competition_id)?;
    ensure_phase_empty(store, competition_id, &[Phase::Semifinal])?;
    let top4 = match request.top4_teams {
        Some(ids) => ids,
        None => {
            let classification = recalculate(store, competition_id)?;
            if classification.rows.len() < 4 {
                return Err(CompetitionError::InvalidInput(format!(
                    "At least 4 teams are required for the playoffs (found {})",
                    classification.rows.len()
                )));
            }
            classification.rows.iter().take(4).map(|s| s.team_id).collect()
        }
    };
    let specs = generate_semifinals(&top4)?;
    let created = insert_specs(store, competition_id, specs)?;
    log::info!("Generated semifinals for competition {}", competition_id);
    Ok(created)
}

/// Third-place match and final, from the given teams or from the decided semifinals.
pub fn generate_final_matches(
    store: &mut Store,
    competition_id: CompetitionId,
    request: FinalsRequest,
) -> Result<Vec<GameMatch>, CompetitionError> {
    store.competition(competition_id)?;
    ensure_phase_empty(store, competition_id, &[Phase::ThirdPlace, Phase::Final])?;
    let (winners, losers) = match (request.semifinal_winners, request.semifinal_losers) {
        (Some(winners), Some(losers)) => (winners, losers),
        (None, None) => {
            let semifinals: Vec<&GameMatch> = store
                .matches
                .iter()
                .filter(|m| m.competition_id == competition_id && m.phase == Phase::Semifinal)
                .collect();
            semifinal_outcome(&semifinals)?
        }
        _ => {
            return Err(CompetitionError::InvalidInput(
                "semifinalWinners and semifinalLosers must be given together".to_string(),
            ))
        }
    };
    let specs = generate_third_place_and_final(&winners, &losers)?;
    let created = insert_specs(store, competition_id, specs)?;
    log::info!(
        "Generated third-place match and final for competition {}",
        competition_id
    );
    Ok(created)
}

/// Refuse to generate a knockout round that the competition already has.
fn ensure_phase_empty(
    store: &Store,
    competition_id: CompetitionId,
    phases: &[Phase],
) -> Result<(), CompetitionError> {
    match store
        .matches
        .iter()
        .find(|m| m.competition_id == competition_id && phases.contains(&m.phase))
    {
        Some(existing) => Err(CompetitionError::InvalidInput(format!(
            "{:?} matches were already generated for this competition",
            existing.phase
        ))),
        None => Ok(()),
    }
}

/// Store generated pairings after checking team membership and duplicates.
fn insert_specs(
    store: &mut Store,
    competition_id: CompetitionId,
    specs: Vec<MatchSpec>,
) -> Result<Vec<GameMatch>, CompetitionError> {
    let mut created = Vec::with_capacity(specs.len());
    for spec in specs {
        for team_id in [spec.home_team_id, spec.away_team_id] {
            if store.team(team_id)?.competition_id != competition_id {
                return Err(CompetitionError::validation(format!(
                    "Team {team_id} does not belong to this competition"
                )));
            }
        }
        check_not_duplicate(
            store.matches.iter().filter(|m| m.competition_id == competition_id),
            &spec,
        )?;
        let game = GameMatch::new(competition_id, spec);
        store.matches.push(game.clone());
        created.push(game);
    }
    Ok(created)
}
