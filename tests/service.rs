//! Integration tests for store-backed operations: teams, matches, results and playoffs.

use competition_manager::service::classification::{recalculate, standings_csv, standings_table};
use competition_manager::service::competitions::{
    create_competition, delete_competition, update_competition, NewCompetition,
    UpdateCompetition,
};
use competition_manager::service::matches::{
    create_match, generate_final_matches, generate_group_matches, generate_semifinal_matches,
    matches_by_phase, submit_result, update_status, FinalsRequest, GroupRequest,
    MatchResultInput, NewMatch, SemifinalRequest, MAX_SCORE,
};
use competition_manager::service::players::{add_participant, NewParticipant};
use competition_manager::service::teams::{create_team, delete_team, NewTeam};
use competition_manager::{
    CompetitionError, CompetitionId, Database, GameMatch, MatchStatus, Outcome, Phase,
    ScoringMode, Store, TeamId,
};

fn competition(store: &mut Store, max_teams: u32, mode: ScoringMode) -> CompetitionId {
    create_competition(
        store,
        NewCompetition {
            name: "Cup".to_string(),
            max_teams,
            max_participants_per_team: 2,
            scoring_mode: Some(mode),
        },
        ScoringMode::ScoreBased,
    )
    .unwrap()
    .id
}

fn team(store: &mut Store, competition_id: CompetitionId, name: &str) -> TeamId {
    create_team(
        store,
        NewTeam {
            name: name.to_string(),
            institution: "Institute".to_string(),
            competition_id,
            participants: Vec::new(),
        },
    )
    .unwrap()
    .team
    .id
}

fn new_match(competition_id: CompetitionId, home: TeamId, away: TeamId) -> NewMatch {
    NewMatch {
        competition_id,
        home_team_id: home,
        away_team_id: away,
        phase: None,
        round: None,
        match_date: None,
    }
}

fn score(home: u32, away: u32) -> MatchResultInput {
    MatchResultInput {
        home_score: Some(home),
        away_score: Some(away),
        result: None,
    }
}

/// Competition with four teams A, B, C, D registered in that order.
fn four_team_cup(store: &mut Store) -> (CompetitionId, Vec<TeamId>) {
    let cid = competition(store, 8, ScoringMode::ScoreBased);
    let teams = ["A", "B", "C", "D"].iter().map(|n| team(store, cid, n)).collect();
    (cid, teams)
}

fn find(matches: &[GameMatch], home: TeamId, away: TeamId) -> GameMatch {
    matches
        .iter()
        .find(|m| m.home_team_id == home && m.away_team_id == away)
        .cloned()
        .unwrap()
}

#[test]
fn reversed_pair_is_rejected_as_duplicate() {
    let mut store = Store::default();
    let cid = competition(&mut store, 4, ScoringMode::ScoreBased);
    let a = team(&mut store, cid, "A");
    let b = team(&mut store, cid, "B");

    create_match(&mut store, new_match(cid, a, b)).unwrap();
    assert_eq!(
        create_match(&mut store, new_match(cid, b, a)),
        Err(CompetitionError::DuplicateMatch)
    );
}

#[test]
fn team_cannot_play_itself() {
    let mut store = Store::default();
    let cid = competition(&mut store, 4, ScoringMode::ScoreBased);
    let a = team(&mut store, cid, "A");

    assert!(matches!(
        create_match(&mut store, new_match(cid, a, a)),
        Err(CompetitionError::Validation(_))
    ));
}

#[test]
fn match_teams_must_share_the_competition() {
    let mut store = Store::default();
    let first = competition(&mut store, 4, ScoringMode::ScoreBased);
    let second = competition(&mut store, 4, ScoringMode::ScoreBased);
    let a = team(&mut store, first, "A");
    let b = team(&mut store, second, "B");

    assert!(matches!(
        create_match(&mut store, new_match(first, a, b)),
        Err(CompetitionError::Validation(_))
    ));
}

#[test]
fn team_registration_rules() {
    let mut store = Store::default();
    let cid = competition(&mut store, 2, ScoringMode::ScoreBased);
    team(&mut store, cid, "Lions");

    let dup = create_team(
        &mut store,
        NewTeam {
            name: "lions".to_string(),
            institution: "Elsewhere".to_string(),
            competition_id: cid,
            participants: Vec::new(),
        },
    );
    assert_eq!(dup.unwrap_err(), CompetitionError::DuplicateTeamName);

    let crowded = create_team(
        &mut store,
        NewTeam {
            name: "Tigers".to_string(),
            institution: "Zoo".to_string(),
            competition_id: cid,
            participants: (0..3)
                .map(|i| NewParticipant {
                    name: format!("P{i}"),
                    email: None,
                })
                .collect(),
        },
    );
    assert_eq!(
        crowded.unwrap_err(),
        CompetitionError::ParticipantLimitReached { max: 2 }
    );

    let tigers = team(&mut store, cid, "Tigers");
    let full = create_team(
        &mut store,
        NewTeam {
            name: "Bears".to_string(),
            institution: "Zoo".to_string(),
            competition_id: cid,
            participants: Vec::new(),
        },
    );
    assert_eq!(full.unwrap_err(), CompetitionError::TeamLimitReached { max: 2 });

    for name in ["Ann", "Bob"] {
        add_participant(
            &mut store,
            tigers,
            NewParticipant {
                name: name.to_string(),
                email: None,
            },
        )
        .unwrap();
    }
    let third = add_participant(
        &mut store,
        tigers,
        NewParticipant {
            name: "Cid".to_string(),
            email: None,
        },
    );
    assert_eq!(
        third.unwrap_err(),
        CompetitionError::ParticipantLimitReached { max: 2 }
    );
}

#[test]
fn submitting_results_rebuilds_standings() {
    let mut store = Store::default();
    let cid = competition(&mut store, 3, ScoringMode::ScoreBased);
    let a = team(&mut store, cid, "A");
    let b = team(&mut store, cid, "B");
    let c = team(&mut store, cid, "C");

    let matches = generate_group_matches(&mut store, cid, GroupRequest::default()).unwrap();
    assert_eq!(matches.len(), 3);
    submit_result(&mut store, find(&matches, a, b).id, score(3, 1)).unwrap();
    submit_result(&mut store, find(&matches, b, c).id, score(2, 2)).unwrap();
    submit_result(&mut store, find(&matches, a, c).id, score(0, 0)).unwrap();

    let table = standings_table(&store, cid).unwrap();
    let order: Vec<_> = table.standings.iter().map(|r| r.team.name.as_str()).collect();
    assert_eq!(order, ["A", "C", "B"]);
    assert_eq!(table.standings[0].points, 4);
    assert_eq!(table.standings[0].matches, 2);
    assert_eq!(table.standings[2].goal_difference, -2);

    // team records mirror the classification
    let stored_a = store.team(a).unwrap();
    assert_eq!(stored_a.position, Some(1));
    assert_eq!(stored_a.stats.points, 4);

    // correcting a result replaces, never adds
    submit_result(&mut store, find(&matches, a, b).id, score(0, 1)).unwrap();
    let a_row = recalculate(&mut store, cid)
        .unwrap()
        .rows
        .into_iter()
        .find(|r| r.team_id == a)
        .unwrap();
    assert_eq!(a_row.stats.points, 1);
    assert_eq!(a_row.stats.played(), 2);
}

#[test]
fn recalculate_twice_gives_same_rows() {
    let mut store = Store::default();
    let (cid, t) = four_team_cup(&mut store);
    let matches = generate_group_matches(&mut store, cid, GroupRequest::default()).unwrap();
    submit_result(&mut store, find(&matches, t[0], t[1]).id, score(1, 0)).unwrap();

    let first = recalculate(&mut store, cid).unwrap().rows;
    let second = recalculate(&mut store, cid).unwrap().rows;
    assert_eq!(first, second);
}

#[test]
fn scoring_mode_controls_accepted_results() {
    let mut store = Store::default();
    let cid = competition(&mut store, 4, ScoringMode::SymbolicResult);
    let a = team(&mut store, cid, "A");
    let b = team(&mut store, cid, "B");
    let m = create_match(&mut store, new_match(cid, a, b)).unwrap();

    assert!(matches!(
        submit_result(&mut store, m.id, score(1, 0)),
        Err(CompetitionError::Validation(_))
    ));
    let done = submit_result(
        &mut store,
        m.id,
        MatchResultInput {
            result: Some(Outcome::AwayWin),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(done.status, MatchStatus::Completed);
    assert_eq!(done.home_score, None);

    let table = standings_table(&store, cid).unwrap();
    assert_eq!(table.standings[0].team.id, b);
    assert_eq!(table.standings[0].points, 2);
    assert_eq!(table.standings[0].goals_for, 0);
}

#[test]
fn completing_without_result_is_rejected() {
    let mut store = Store::default();
    let cid = competition(&mut store, 4, ScoringMode::ScoreBased);
    let a = team(&mut store, cid, "A");
    let b = team(&mut store, cid, "B");
    let m = create_match(&mut store, new_match(cid, a, b)).unwrap();

    assert!(matches!(
        update_status(&mut store, m.id, MatchStatus::Completed),
        Err(CompetitionError::InvalidMatch(_))
    ));

    submit_result(&mut store, m.id, score(2, 0)).unwrap();
    update_status(&mut store, m.id, MatchStatus::Cancelled).unwrap();
    let table = standings_table(&store, cid).unwrap();
    assert!(table.standings.iter().all(|r| r.points == 0));
}

#[test]
fn failed_transaction_leaves_store_untouched() {
    let db = Database::new();
    let (cid, t) = db.transaction(|s| Ok(four_team_cup(s))).unwrap();
    db.transaction(|s| create_match(s, new_match(cid, t[0], t[1])))
        .unwrap();

    // C, D, A, B: the clashing A-B pair is generated last
    let request = GroupRequest {
        team_ids: Some(vec![t[2], t[3], t[0], t[1]]),
    };
    let result = db.transaction(|s| generate_group_matches(s, cid, request));
    assert_eq!(result.unwrap_err(), CompetitionError::DuplicateMatch);

    let count = db.read(|s| Ok(s.matches_in(cid).len())).unwrap();
    assert_eq!(count, 1);
}

#[test]
fn full_playoff_flow() {
    let mut store = Store::default();
    let (cid, t) = four_team_cup(&mut store);
    let (a, b, c, d) = (t[0], t[1], t[2], t[3]);
    let group = generate_group_matches(&mut store, cid, GroupRequest::default()).unwrap();
    assert_eq!(group.len(), 6);

    // A 6 pts, B 4 pts, C 2 pts, D 0 pts
    for (home, away, s) in [
        (a, b, score(1, 0)),
        (a, c, score(2, 0)),
        (a, d, score(3, 0)),
        (b, c, score(1, 0)),
        (b, d, score(1, 0)),
        (c, d, score(1, 0)),
    ] {
        submit_result(&mut store, find(&group, home, away).id, s).unwrap();
    }

    let semis =
        generate_semifinal_matches(&mut store, cid, SemifinalRequest::default()).unwrap();
    assert_eq!((semis[0].home_team_id, semis[0].away_team_id), (a, d));
    assert_eq!((semis[1].home_team_id, semis[1].away_team_id), (b, c));
    assert!(semis.iter().all(|m| m.round == Some(1)));

    // finals need decided semifinals
    assert!(generate_final_matches(&mut store, cid, FinalsRequest::default()).is_err());

    // knockout matches cannot be drawn
    assert!(matches!(
        submit_result(&mut store, semis[0].id, score(1, 1)),
        Err(CompetitionError::Validation(_))
    ));
    submit_result(&mut store, semis[0].id, score(0, 2)).unwrap();
    submit_result(&mut store, semis[1].id, score(3, 1)).unwrap();

    let finals = generate_final_matches(&mut store, cid, FinalsRequest::default()).unwrap();
    assert_eq!(finals[0].phase, Phase::ThirdPlace);
    assert_eq!((finals[0].home_team_id, finals[0].away_team_id), (a, c));
    assert_eq!(finals[1].phase, Phase::Final);
    assert_eq!((finals[1].home_team_id, finals[1].away_team_id), (d, b));

    assert_eq!(matches_by_phase(&store, cid, Phase::Final).unwrap().len(), 1);
    assert!(matches!(
        generate_final_matches(&mut store, cid, FinalsRequest::default()),
        Err(CompetitionError::InvalidInput(_))
    ));
}

#[test]
fn playoffs_need_four_teams() {
    let mut store = Store::default();
    let cid = competition(&mut store, 8, ScoringMode::ScoreBased);
    for n in ["A", "B", "C"] {
        team(&mut store, cid, n);
    }
    assert!(matches!(
        generate_semifinal_matches(&mut store, cid, SemifinalRequest::default()),
        Err(CompetitionError::InvalidInput(_))
    ));
}

#[test]
fn deleting_a_team_drops_its_matches_from_standings() {
    let mut store = Store::default();
    let (cid, t) = four_team_cup(&mut store);
    let group = generate_group_matches(&mut store, cid, GroupRequest::default()).unwrap();
    submit_result(&mut store, find(&group, t[0], t[1]).id, score(4, 0)).unwrap();

    delete_team(&mut store, t[0]).unwrap();

    assert_eq!(store.matches_in(cid).len(), 3);
    let table = standings_table(&store, cid).unwrap();
    assert_eq!(table.standings.len(), 3);
    assert!(table.standings.iter().all(|r| r.matches == 0));
}

#[test]
fn deleting_a_competition_cascades() {
    let mut store = Store::default();
    let (cid, t) = four_team_cup(&mut store);
    add_participant(
        &mut store,
        t[0],
        NewParticipant {
            name: "Ann".to_string(),
            email: Some("ann@example.com".to_string()),
        },
    )
    .unwrap();
    generate_group_matches(&mut store, cid, GroupRequest::default()).unwrap();
    let other = competition(&mut store, 2, ScoringMode::ScoreBased);
    team(&mut store, other, "Survivor");

    delete_competition(&mut store, cid).unwrap();

    assert!(store.competition(cid).is_err());
    assert!(store.teams.iter().all(|t| t.competition_id == other));
    assert!(store.players.is_empty());
    assert!(store.matches.is_empty());
    assert!(store.classification(cid).is_none());
    assert!(store.classification(other).is_some());
}

#[test]
fn standings_export_as_csv() {
    let mut store = Store::default();
    let (cid, _) = four_team_cup(&mut store);

    let csv = standings_csv(&store, cid).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("position,team,institution,played,wins,draws,losses,goals_for,goals_against,goal_difference,points")
    );
    assert_eq!(lines.next(), Some("1,A,Institute,0,0,0,0,0,0,0,0"));
    assert_eq!(csv.lines().count(), 5);
}

#[test]
fn semifinals_are_generated_once() {
    let mut store = Store::default();
    let (cid, t) = four_team_cup(&mut store);
    let e = team(&mut store, cid, "E");
    let semis =
        generate_semifinal_matches(&mut store, cid, SemifinalRequest::default()).unwrap();
    assert_eq!(semis.len(), 2);

    // a different top 4 must not add a second bracket
    let request = SemifinalRequest {
        top4_teams: Some(vec![e, t[1], t[2], t[3]]),
    };
    assert!(matches!(
        generate_semifinal_matches(&mut store, cid, request),
        Err(CompetitionError::InvalidInput(_))
    ));
    assert_eq!(matches_by_phase(&store, cid, Phase::Semifinal).unwrap().len(), 2);
}

#[test]
fn finals_are_generated_once() {
    let mut store = Store::default();
    let (cid, t) = four_team_cup(&mut store);
    let request = FinalsRequest {
        semifinal_winners: Some(vec![t[0], t[1]]),
        semifinal_losers: Some(vec![t[2], t[3]]),
    };
    generate_final_matches(&mut store, cid, request).unwrap();

    let swapped = FinalsRequest {
        semifinal_winners: Some(vec![t[2], t[3]]),
        semifinal_losers: Some(vec![t[0], t[1]]),
    };
    assert!(matches!(
        generate_final_matches(&mut store, cid, swapped),
        Err(CompetitionError::InvalidInput(_))
    ));
    assert_eq!(matches_by_phase(&store, cid, Phase::Final).unwrap().len(), 1);
    assert_eq!(matches_by_phase(&store, cid, Phase::ThirdPlace).unwrap().len(), 1);
}

#[test]
fn semifinals_for_unknown_competition_is_not_found() {
    let mut store = Store::default();
    let (_, t) = four_team_cup(&mut store);
    let request = SemifinalRequest {
        top4_teams: Some(t.clone()),
    };
    assert!(matches!(
        generate_semifinal_matches(&mut store, uuid::Uuid::new_v4(), request),
        Err(CompetitionError::NotFound { entity: "Competition", .. })
    ));
}

#[test]
fn oversized_scores_fail_without_poisoning_the_store() {
    let db = Database::new();
    let (cid, t) = db.transaction(|s| Ok(four_team_cup(s))).unwrap();
    let ab = db
        .transaction(|s| create_match(s, new_match(cid, t[0], t[1])))
        .unwrap();
    let ac = db
        .transaction(|s| create_match(s, new_match(cid, t[0], t[2])))
        .unwrap();

    assert!(matches!(
        db.transaction(|s| submit_result(s, ab.id, score(u32::MAX, 0))),
        Err(CompetitionError::Validation(_))
    ));
    db.transaction(|s| submit_result(s, ab.id, score(MAX_SCORE, 0)))
        .unwrap();

    // totals past u32::MAX already stored in history fail the rebuild
    let overflow = db.transaction(|s| {
        let game = s.game_mut(ac.id)?;
        game.home_score = Some(u32::MAX);
        game.away_score = Some(0);
        game.result = Some(Outcome::HomeWin);
        game.status = MatchStatus::Completed;
        recalculate(s, cid)
    });
    assert!(matches!(overflow, Err(CompetitionError::InvalidMatch(_))));

    let table = db.read(|s| standings_table(s, cid)).unwrap();
    assert_eq!(table.standings[0].goals_for, MAX_SCORE);
    assert_eq!(table.standings[0].points, 2);
}

#[test]
fn limits_cannot_drop_below_registrations() {
    let mut store = Store::default();
    let (cid, t) = four_team_cup(&mut store);
    for name in ["Ann", "Bob"] {
        add_participant(
            &mut store,
            t[0],
            NewParticipant {
                name: name.to_string(),
                email: None,
            },
        )
        .unwrap();
    }

    let fewer_teams = UpdateCompetition {
        max_teams: Some(3),
        ..UpdateCompetition::default()
    };
    assert!(matches!(
        update_competition(&mut store, cid, fewer_teams),
        Err(CompetitionError::Validation(_))
    ));

    let fewer_participants = UpdateCompetition {
        max_participants_per_team: Some(1),
        ..UpdateCompetition::default()
    };
    assert!(matches!(
        update_competition(&mut store, cid, fewer_participants),
        Err(CompetitionError::Validation(_))
    ));

    let same = UpdateCompetition {
        max_participants_per_team: Some(2),
        ..UpdateCompetition::default()
    };
    assert_eq!(
        update_competition(&mut store, cid, same)
            .unwrap()
            .max_participants_per_team,
        2
    );
}
