//! Standings: rebuild per-team stats from completed matches and rank them.

use crate::error::CompetitionError;
use crate::models::{
    CompetitionId, GameMatch, Standing, Team, TeamId, TeamOutcome, TeamStats,
};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Recompute the standings of a competition from its match history.
///
/// 1. Start every team in `teams` from zeroed stats.
/// 2. Replay each completed match (2 points per win, 1 per draw).
/// 3. Sort by points, goal difference, goals for (all descending); remaining
///    ties keep the order of `teams`.
/// 4. Assign 1-based positions.
///
/// Matches that are not completed are ignored. The result depends only on the
/// inputs, so calling this repeatedly on the same history gives the same rows.
pub fn recompute_standings(
    competition_id: CompetitionId,
    matches: &[GameMatch],
    teams: &[Team],
) -> Result<Vec<Standing>, CompetitionError> {
    let index: HashMap<TeamId, usize> = teams.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
    let mut stats = vec![TeamStats::default(); teams.len()];

    for m in matches {
        if m.competition_id != competition_id {
            return Err(CompetitionError::InvalidMatch(format!(
                "match {} belongs to another competition",
                m.id
            )));
        }
        if m.home_team_id == m.away_team_id {
            return Err(CompetitionError::InvalidMatch(format!(
                "match {} has the same team on both sides",
                m.id
            )));
        }
        if !m.is_completed() {
            continue;
        }
        let outcome = m.outcome().ok_or_else(|| {
            CompetitionError::InvalidMatch(format!("match {} is completed without a result", m.id))
        })?;
        let home = *index
            .get(&m.home_team_id)
            .ok_or(CompetitionError::not_found("Team", m.home_team_id))?;
        let away = *index
            .get(&m.away_team_id)
            .ok_or(CompetitionError::not_found("Team", m.away_team_id))?;

        let (home_outcome, away_outcome) = TeamOutcome::split(outcome);
        let scores = m.scores();
        stats[home].record(home_outcome, scores)?;
        stats[away].record(away_outcome, scores.map(|(h, a)| (a, h)))?;
    }

    let mut rows: Vec<Standing> = teams
        .iter()
        .zip(stats)
        .map(|(team, stats)| Standing {
            team_id: team.id,
            team_name: team.name.clone(),
            institution: team.institution.clone(),
            stats,
            position: 0,
        })
        .collect();

    // sort_by is stable: fully tied teams stay in input order
    rows.sort_by(|a, b| compare_stats(&a.stats, &b.stats));
    for (i, row) in rows.iter_mut().enumerate() {
        row.position = i as u32 + 1;
    }
    Ok(rows)
}

/// Ranking order: higher points, then goal difference, then goals scored.
pub fn compare_stats(a: &TeamStats, b: &TeamStats) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference.cmp(&a.goal_difference))
        .then(b.goals_for.cmp(&a.goals_for))
}
