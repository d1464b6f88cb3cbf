//! Classification: persist recomputed standings and render them for clients.

use crate::error::CompetitionError;
use crate::logic::recompute_standings;
use crate::models::{Classification, CompetitionId, Standing, TeamId};
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Rebuild the classification of a competition from its full match history.
///
/// Overwrites every classification row and mirrors the stats and positions
/// onto the team records. Safe to re-run at any time; run it inside a
/// transaction so a failure leaves the previous rows in place.
pub fn recalculate(
    store: &mut Store,
    competition_id: CompetitionId,
) -> Result<Classification, CompetitionError> {
    store.competition(competition_id)?;
    let teams = store.teams_in(competition_id);
    let matches = store.matches_in(competition_id);
    let rows = recompute_standings(competition_id, &matches, &teams)?;

    for row in &rows {
        let team = store.team_mut(row.team_id)?;
        team.stats = row.stats;
        team.position = Some(row.position);
    }
    let classification = Classification {
        competition_id,
        rows,
        updated_at: Utc::now(),
    };
    store.put_classification(classification.clone());
    log::info!(
        "Recalculated classification of competition {} ({} teams, {} matches)",
        competition_id,
        teams.len(),
        matches.iter().filter(|m| m.is_completed()).count()
    );
    Ok(classification)
}

/// Current classification rows in rank order.
///
/// Computed on the fly when nothing has been stored yet.
pub fn classification(
    store: &Store,
    competition_id: CompetitionId,
) -> Result<Classification, CompetitionError> {
    store.competition(competition_id)?;
    if let Some(stored) = store.classification(competition_id) {
        return Ok(stored.clone());
    }
    let rows = recompute_standings(
        competition_id,
        &store.matches_in(competition_id),
        &store.teams_in(competition_id),
    )?;
    Ok(Classification {
        competition_id,
        rows,
        updated_at: Utc::now(),
    })
}

/// Team columns of a standings row.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    pub institution: String,
}

/// Display row of the standings table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub position: u32,
    pub team: TeamSummary,
    pub points: u32,
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
}

impl From<&Standing> for StandingsRow {
    fn from(s: &Standing) -> Self {
        Self {
            position: s.position,
            team: TeamSummary {
                id: s.team_id,
                name: s.team_name.clone(),
                institution: s.institution.clone(),
            },
            points: s.stats.points,
            matches: s.stats.played(),
            wins: s.stats.wins,
            draws: s.stats.draws,
            losses: s.stats.losses,
            goals_for: s.stats.goals_for,
            goals_against: s.stats.goals_against,
            goal_difference: s.stats.goal_difference,
        }
    }
}

/// Standings table as served to the frontend.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsTable {
    pub competition_id: CompetitionId,
    pub standings: Vec<StandingsRow>,
    pub last_updated: DateTime<Utc>,
}

pub fn standings_table(
    store: &Store,
    competition_id: CompetitionId,
) -> Result<StandingsTable, CompetitionError> {
    let classification = classification(store, competition_id)?;
    Ok(StandingsTable {
        competition_id,
        standings: classification.rows.iter().map(StandingsRow::from).collect(),
        last_updated: classification.updated_at,
    })
}

const CSV_HEADER: [&str; 11] = [
    "position",
    "team",
    "institution",
    "played",
    "wins",
    "draws",
    "losses",
    "goals_for",
    "goals_against",
    "goal_difference",
    "points",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    position: u32,
    team: &'a str,
    institution: &'a str,
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_for: u32,
    goals_against: u32,
    goal_difference: i64,
    points: u32,
}

/// Standings as CSV, one row per team, header included.
pub fn standings_csv(
    store: &Store,
    competition_id: CompetitionId,
) -> Result<String, CompetitionError> {
    let classification = classification(store, competition_id)?;
    let mut writer = csv::Writer::from_writer(Vec::new());
    if classification.rows.is_empty() {
        // serialize() only emits the header together with the first record
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| CompetitionError::Internal(format!("csv encode: {e}")))?;
    }
    for s in &classification.rows {
        writer
            .serialize(CsvRow {
                position: s.position,
                team: &s.team_name,
                institution: &s.institution,
                played: s.stats.played(),
                wins: s.stats.wins,
                draws: s.stats.draws,
                losses: s.stats.losses,
                goals_for: s.stats.goals_for,
                goals_against: s.stats.goals_against,
                goal_difference: s.stats.goal_difference,
                points: s.stats.points,
            })
            .map_err(|e| CompetitionError::Internal(format!("csv encode: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CompetitionError::Internal(format!("csv flush: {e}")))?;
    String::from_utf8(bytes).map_err(|e| CompetitionError::Internal(format!("csv utf8: {e}")))
}
