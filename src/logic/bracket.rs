//! Bracket generation: group round robin, then a top-4 single-elimination bracket.
//!
//! All functions are deterministic: the same input order always produces the
//! same pairings and home/away assignment.

use crate::error::CompetitionError;
use crate::models::{GameMatch, MatchSpec, Phase, TeamId};
use std::collections::HashSet;

/// Round of the semifinals.
pub const SEMIFINAL_ROUND: u32 = 1;
/// Round of the final and the third-place match.
pub const FINAL_ROUND: u32 = 2;

/// Every unordered pair of `team_ids` exactly once, earlier-indexed team at home.
///
/// `n` teams give `n * (n - 1) / 2` group matches.
pub fn generate_round_robin(team_ids: &[TeamId]) -> Result<Vec<MatchSpec>, CompetitionError> {
    if team_ids.len() < 2 {
        return Err(CompetitionError::InsufficientTeams {
            found: team_ids.len(),
        });
    }
    ensure_distinct(team_ids)?;

    let mut specs = Vec::with_capacity(team_ids.len() * (team_ids.len() - 1) / 2);
    for (i, &home) in team_ids.iter().enumerate() {
        for &away in &team_ids[i + 1..] {
            specs.push(MatchSpec {
                home_team_id: home,
                away_team_id: away,
                phase: Phase::Group,
                round: None,
            });
        }
    }
    Ok(specs)
}

/// Seeded semifinals from the top 4 in rank order: 1st vs 4th, 2nd vs 3rd.
pub fn generate_semifinals(ranked_top4: &[TeamId]) -> Result<Vec<MatchSpec>, CompetitionError> {
    let [first, second, third, fourth] = ranked_top4 else {
        return Err(CompetitionError::InvalidInput(format!(
            "Semifinals need exactly 4 ranked teams (got {})",
            ranked_top4.len()
        )));
    };
    ensure_distinct(ranked_top4)?;
    Ok(vec![
        knockout(*first, *fourth, Phase::Semifinal, SEMIFINAL_ROUND),
        knockout(*second, *third, Phase::Semifinal, SEMIFINAL_ROUND),
    ])
}

/// Third-place match between the semifinal losers, then the final between the winners.
pub fn generate_third_place_and_final(
    winners: &[TeamId],
    losers: &[TeamId],
) -> Result<Vec<MatchSpec>, CompetitionError> {
    let ([w1, w2], [l1, l2]) = (winners, losers) else {
        return Err(CompetitionError::InvalidInput(format!(
            "Need 2 semifinal winners and 2 semifinal losers (got {} and {})",
            winners.len(),
            losers.len()
        )));
    };
    let all = [*w1, *w2, *l1, *l2];
    ensure_distinct(&all)?;
    Ok(vec![
        knockout(*l1, *l2, Phase::ThirdPlace, FINAL_ROUND),
        knockout(*w1, *w2, Phase::Final, FINAL_ROUND),
    ])
}

/// Winners and losers of the two semifinals, in semifinal order.
///
/// Fails unless exactly two semifinals exist and both are decided.
pub fn semifinal_outcome(
    semifinals: &[&GameMatch],
) -> Result<(Vec<TeamId>, Vec<TeamId>), CompetitionError> {
    if semifinals.len() != 2 {
        return Err(CompetitionError::InvalidInput(format!(
            "Expected 2 semifinals (found {})",
            semifinals.len()
        )));
    }
    let mut winners = Vec::with_capacity(2);
    let mut losers = Vec::with_capacity(2);
    for m in semifinals {
        if !m.is_completed() {
            return Err(CompetitionError::InvalidInput(
                "Both semifinals must be completed first".to_string(),
            ));
        }
        let (winner, loser) = m.winner_and_loser().ok_or_else(|| {
            CompetitionError::InvalidInput(format!("Semifinal {} has no winner", m.id))
        })?;
        winners.push(winner);
        losers.push(loser);
    }
    Ok((winners, losers))
}

/// Reject a new match if the pair already meets in this phase, in either order.
pub fn check_not_duplicate<'a>(
    existing: impl IntoIterator<Item = &'a GameMatch>,
    spec: &MatchSpec,
) -> Result<(), CompetitionError> {
    let duplicate = existing
        .into_iter()
        .any(|m| m.phase == spec.phase && m.is_between(spec.home_team_id, spec.away_team_id));
    if duplicate {
        return Err(CompetitionError::DuplicateMatch);
    }
    Ok(())
}

fn knockout(home: TeamId, away: TeamId, phase: Phase, round: u32) -> MatchSpec {
    MatchSpec {
        home_team_id: home,
        away_team_id: away,
        phase,
        round: Some(round),
    }
}

fn ensure_distinct(team_ids: &[TeamId]) -> Result<(), CompetitionError> {
    let mut seen = HashSet::with_capacity(team_ids.len());
    for id in team_ids {
        if !seen.insert(id) {
            return Err(CompetitionError::InvalidInput(format!(
                "Team {id} appears more than once"
            )));
        }
    }
    Ok(())
}
