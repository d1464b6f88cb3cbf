//! REST API: JSON in, JSON out. Every mutating handler runs one store transaction.
//!
//! Mounted under `/api` by [`configure`].

use crate::config::Config;
use crate::error::CompetitionError;
use crate::models::{CompetitionId, MatchId, MatchStatus, Phase, PlayerId, TeamId};
use crate::service::classification::{classification, recalculate, standings_csv, standings_table};
use crate::service::competitions::{
    competition_matches, competition_teams, create_competition, delete_competition,
    get_competition, list_competitions, update_competition, NewCompetition, UpdateCompetition,
};
use crate::service::matches::{
    create_match, delete_match, generate_final_matches, generate_group_matches,
    generate_semifinal_matches, get_match, list_matches, matches_by_phase, matches_by_team,
    submit_result, update_match, update_status, FinalsRequest, GroupRequest, MatchResultInput,
    NewMatch, SemifinalRequest, UpdateMatch,
};
use crate::service::players::{
    add_participant, create_player, delete_player, get_player, list_participants,
    players_by_team, remove_participant, update_participant, update_player, NewParticipant,
    NewPlayer, UpdatePlayer,
};
use crate::service::teams::{
    create_team, delete_team, get_team, list_teams, teams_by_competition, update_team, NewTeam,
    UpdateTeam,
};
use crate::store::Database;
use actix_web::{
    delete,
    error::{JsonPayloadError, PathError},
    get, post, put,
    web::{self, Data, Json, Path},
    HttpRequest, HttpResponse,
};
use serde::{Deserialize, Serialize};

/// Shared store handle.
type Db = Data<Database>;

type ApiResult = Result<HttpResponse, CompetitionError>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: entity id (e.g. /api/competitions/{id})
#[derive(Deserialize)]
struct IdPath {
    id: uuid::Uuid,
}

/// Path segments: team id and participant id
#[derive(Deserialize)]
struct ParticipantPath {
    id: TeamId,
    participant_id: PlayerId,
}

#[derive(Deserialize)]
struct PhasePath {
    id: CompetitionId,
    phase: String,
}

#[derive(Deserialize)]
struct StatusBody {
    status: MatchStatus,
}

#[derive(Serialize)]
struct RecalculateResponse<T> {
    message: &'static str,
    classifications: T,
}

/// Register all API routes under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/api")
                .service(api_health)
                .service(api_list_competitions)
                .service(api_create_competition)
                .service(api_get_competition)
                .service(api_update_competition)
                .service(api_delete_competition)
                .service(api_competition_teams)
                .service(api_competition_matches)
                .service(api_competition_classification)
                .service(api_competition_standings)
                .service(api_competition_standings_csv)
                .service(api_recalculate_classification)
                .service(api_competition_generate_group)
                .service(api_competition_generate_playoffs)
                .service(api_list_teams)
                .service(api_create_team)
                .service(api_teams_by_competition)
                .service(api_get_team)
                .service(api_update_team)
                .service(api_delete_team)
                .service(api_list_participants)
                .service(api_add_participant)
                .service(api_update_participant)
                .service(api_remove_participant)
                .service(api_create_player)
                .service(api_players_by_team)
                .service(api_get_player)
                .service(api_update_player)
                .service(api_delete_player)
                .service(api_list_matches)
                .service(api_create_match)
                .service(api_matches_by_team)
                .service(api_matches_by_competition)
                .service(api_matches_by_phase)
                .service(api_generate_group)
                .service(api_generate_semifinals)
                .service(api_generate_finals)
                .service(api_get_match)
                .service(api_update_match)
                .service(api_delete_match)
                .service(api_submit_result)
                .service(api_update_status),
        );
}

/// Malformed JSON bodies are validation errors with the usual `{"error": ...}` shape.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    CompetitionError::validation(format!("Invalid request body: {err}")).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    CompetitionError::validation(format!("Invalid path parameter: {err}")).into()
}

#[get("/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "competition-manager",
    })
}

// Competitions

#[get("/competitions")]
async fn api_list_competitions(db: Db) -> ApiResult {
    let competitions = db.read(|s| Ok(list_competitions(s)))?;
    Ok(HttpResponse::Ok().json(competitions))
}

#[post("/competitions")]
async fn api_create_competition(
    db: Db,
    config: Data<Config>,
    body: Json<NewCompetition>,
) -> ApiResult {
    let default_mode = config.scoring_mode;
    let competition = db.transaction(|s| create_competition(s, body.into_inner(), default_mode))?;
    Ok(HttpResponse::Created().json(competition))
}

/// Competition with teams, matches and classification.
#[get("/competitions/{id}")]
async fn api_get_competition(db: Db, path: Path<IdPath>) -> ApiResult {
    let details = db.read(|s| get_competition(s, path.id))?;
    Ok(HttpResponse::Ok().json(details))
}

#[put("/competitions/{id}")]
async fn api_update_competition(
    db: Db,
    path: Path<IdPath>,
    body: Json<UpdateCompetition>,
) -> ApiResult {
    let competition = db.transaction(|s| update_competition(s, path.id, body.into_inner()))?;
    Ok(HttpResponse::Ok().json(competition))
}

/// Delete a competition and everything it owns.
#[delete("/competitions/{id}")]
async fn api_delete_competition(db: Db, path: Path<IdPath>) -> ApiResult {
    db.transaction(|s| delete_competition(s, path.id))?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/competitions/{id}/teams")]
async fn api_competition_teams(db: Db, path: Path<IdPath>) -> ApiResult {
    let teams = db.read(|s| competition_teams(s, path.id))?;
    Ok(HttpResponse::Ok().json(teams))
}

#[get("/competitions/{id}/matches")]
async fn api_competition_matches(db: Db, path: Path<IdPath>) -> ApiResult {
    let matches = db.read(|s| competition_matches(s, path.id))?;
    Ok(HttpResponse::Ok().json(matches))
}

#[get("/competitions/{id}/classification")]
async fn api_competition_classification(db: Db, path: Path<IdPath>) -> ApiResult {
    let rows = db.read(|s| classification(s, path.id))?.rows;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/competitions/{id}/standings")]
async fn api_competition_standings(db: Db, path: Path<IdPath>) -> ApiResult {
    let table = db.read(|s| standings_table(s, path.id))?;
    Ok(HttpResponse::Ok().json(table))
}

#[get("/competitions/{id}/standings.csv")]
async fn api_competition_standings_csv(db: Db, path: Path<IdPath>) -> ApiResult {
    let csv = db.read(|s| standings_csv(s, path.id))?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(csv))
}

/// Rebuild the classification from scratch (reset, replay all completed matches, rank).
#[post("/competitions/{id}/classification/recalculate")]
async fn api_recalculate_classification(db: Db, path: Path<IdPath>) -> ApiResult {
    let classification = db.transaction(|s| recalculate(s, path.id))?;
    Ok(HttpResponse::Ok().json(RecalculateResponse {
        message: "Classification recalculated",
        classifications: classification.rows,
    }))
}

#[post("/competitions/{id}/generate-group")]
async fn api_competition_generate_group(
    db: Db,
    path: Path<IdPath>,
    body: Option<Json<GroupRequest>>,
) -> ApiResult {
    let request = body.map(Json::into_inner).unwrap_or_default();
    let matches = db.transaction(|s| generate_group_matches(s, path.id, request))?;
    Ok(HttpResponse::Created().json(matches))
}

/// Semifinals from the current top 4 of the classification.
#[post("/competitions/{id}/generate-playoffs")]
async fn api_competition_generate_playoffs(db: Db, path: Path<IdPath>) -> ApiResult {
    let matches =
        db.transaction(|s| generate_semifinal_matches(s, path.id, SemifinalRequest::default()))?;
    Ok(HttpResponse::Created().json(matches))
}

// Teams

#[get("/teams")]
async fn api_list_teams(db: Db) -> ApiResult {
    let teams = db.read(|s| Ok(list_teams(s)))?;
    Ok(HttpResponse::Ok().json(teams))
}

#[post("/teams")]
async fn api_create_team(db: Db, body: Json<NewTeam>) -> ApiResult {
    let team = db.transaction(|s| create_team(s, body.into_inner()))?;
    Ok(HttpResponse::Created().json(team))
}

#[get("/teams/competition/{id}")]
async fn api_teams_by_competition(db: Db, path: Path<IdPath>) -> ApiResult {
    let teams = db.read(|s| teams_by_competition(s, path.id))?;
    Ok(HttpResponse::Ok().json(teams))
}

#[get("/teams/{id}")]
async fn api_get_team(db: Db, path: Path<IdPath>) -> ApiResult {
    let team = db.read(|s| get_team(s, path.id))?;
    Ok(HttpResponse::Ok().json(team))
}

#[put("/teams/{id}")]
async fn api_update_team(db: Db, path: Path<IdPath>, body: Json<UpdateTeam>) -> ApiResult {
    let team = db.transaction(|s| update_team(s, path.id, body.into_inner()))?;
    Ok(HttpResponse::Ok().json(team))
}

/// Delete a team, its players and its matches.
#[delete("/teams/{id}")]
async fn api_delete_team(db: Db, path: Path<IdPath>) -> ApiResult {
    db.transaction(|s| delete_team(s, path.id))?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/teams/{id}/participants")]
async fn api_list_participants(db: Db, path: Path<IdPath>) -> ApiResult {
    let players = db.read(|s| list_participants(s, path.id))?;
    Ok(HttpResponse::Ok().json(players))
}

#[post("/teams/{id}/participants")]
async fn api_add_participant(db: Db, path: Path<IdPath>, body: Json<NewParticipant>) -> ApiResult {
    let player = db.transaction(|s| add_participant(s, path.id, body.into_inner()))?;
    Ok(HttpResponse::Created().json(player))
}

#[put("/teams/{id}/participants/{participant_id}")]
async fn api_update_participant(
    db: Db,
    path: Path<ParticipantPath>,
    body: Json<UpdatePlayer>,
) -> ApiResult {
    let player = db.transaction(|s| {
        update_participant(s, path.id, path.participant_id, body.into_inner())
    })?;
    Ok(HttpResponse::Ok().json(player))
}

#[delete("/teams/{id}/participants/{participant_id}")]
async fn api_remove_participant(db: Db, path: Path<ParticipantPath>) -> ApiResult {
    db.transaction(|s| remove_participant(s, path.id, path.participant_id))?;
    Ok(HttpResponse::NoContent().finish())
}

// Players

#[post("/players")]
async fn api_create_player(db: Db, body: Json<NewPlayer>) -> ApiResult {
    let player = db.transaction(|s| create_player(s, body.into_inner()))?;
    Ok(HttpResponse::Created().json(player))
}

#[get("/players/team/{id}")]
async fn api_players_by_team(db: Db, path: Path<IdPath>) -> ApiResult {
    let players = db.read(|s| players_by_team(s, path.id))?;
    Ok(HttpResponse::Ok().json(players))
}

#[get("/players/{id}")]
async fn api_get_player(db: Db, path: Path<IdPath>) -> ApiResult {
    let player = db.read(|s| get_player(s, path.id))?;
    Ok(HttpResponse::Ok().json(player))
}

#[put("/players/{id}")]
async fn api_update_player(db: Db, path: Path<IdPath>, body: Json<UpdatePlayer>) -> ApiResult {
    let player = db.transaction(|s| update_player(s, path.id, body.into_inner()))?;
    Ok(HttpResponse::Ok().json(player))
}

#[delete("/players/{id}")]
async fn api_delete_player(db: Db, path: Path<IdPath>) -> ApiResult {
    db.transaction(|s| delete_player(s, path.id))?;
    Ok(HttpResponse::NoContent().finish())
}

// Matches

#[get("/matches")]
async fn api_list_matches(db: Db) -> ApiResult {
    let matches = db.read(|s| Ok(list_matches(s)))?;
    Ok(HttpResponse::Ok().json(matches))
}

#[post("/matches")]
async fn api_create_match(db: Db, body: Json<NewMatch>) -> ApiResult {
    let game = db.transaction(|s| create_match(s, body.into_inner()))?;
    Ok(HttpResponse::Created().json(game))
}

#[get("/matches/team/{id}")]
async fn api_matches_by_team(db: Db, path: Path<IdPath>) -> ApiResult {
    let matches = db.read(|s| matches_by_team(s, path.id))?;
    Ok(HttpResponse::Ok().json(matches))
}

#[get("/matches/competition/{id}")]
async fn api_matches_by_competition(db: Db, path: Path<IdPath>) -> ApiResult {
    let matches = db.read(|s| competition_matches(s, path.id))?;
    Ok(HttpResponse::Ok().json(matches))
}

#[get("/matches/competition/{id}/phase/{phase}")]
async fn api_matches_by_phase(db: Db, path: Path<PhasePath>) -> ApiResult {
    let phase: Phase = path.phase.parse().map_err(CompetitionError::Validation)?;
    let matches = db.read(|s| matches_by_phase(s, path.id, phase))?;
    Ok(HttpResponse::Ok().json(matches))
}

/// Round robin over all teams of the competition, or over the given `teamIds`.
#[post("/matches/competition/{id}/generate-group")]
async fn api_generate_group(
    db: Db,
    path: Path<IdPath>,
    body: Option<Json<GroupRequest>>,
) -> ApiResult {
    let request = body.map(Json::into_inner).unwrap_or_default();
    let matches = db.transaction(|s| generate_group_matches(s, path.id, request))?;
    Ok(HttpResponse::Created().json(matches))
}

#[post("/matches/competition/{id}/generate-semifinals")]
async fn api_generate_semifinals(
    db: Db,
    path: Path<IdPath>,
    body: Option<Json<SemifinalRequest>>,
) -> ApiResult {
    let request = body.map(Json::into_inner).unwrap_or_default();
    let matches = db.transaction(|s| generate_semifinal_matches(s, path.id, request))?;
    Ok(HttpResponse::Created().json(matches))
}

/// Third-place match and final.
#[post("/matches/competition/{id}/generate-finals")]
async fn api_generate_finals(
    db: Db,
    path: Path<IdPath>,
    body: Option<Json<FinalsRequest>>,
) -> ApiResult {
    let request = body.map(Json::into_inner).unwrap_or_default();
    let matches = db.transaction(|s| generate_final_matches(s, path.id, request))?;
    Ok(HttpResponse::Created().json(matches))
}

#[get("/matches/{id}")]
async fn api_get_match(db: Db, path: Path<IdPath>) -> ApiResult {
    let game = db.read(|s| get_match(s, path.id))?;
    Ok(HttpResponse::Ok().json(game))
}

#[put("/matches/{id}")]
async fn api_update_match(db: Db, path: Path<IdPath>, body: Json<UpdateMatch>) -> ApiResult {
    let game = db.transaction(|s| update_match(s, path.id, body.into_inner()))?;
    Ok(HttpResponse::Ok().json(game))
}

#[delete("/matches/{id}")]
async fn api_delete_match(db: Db, path: Path<IdPath>) -> ApiResult {
    let id: MatchId = path.id;
    db.transaction(|s| delete_match(s, id))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Submit a result; the standings are rebuilt in the same transaction.
#[put("/matches/{id}/result")]
async fn api_submit_result(
    db: Db,
    path: Path<IdPath>,
    body: Json<MatchResultInput>,
) -> ApiResult {
    let game = db.transaction(|s| submit_result(s, path.id, body.into_inner()))?;
    Ok(HttpResponse::Ok().json(game))
}

#[put("/matches/{id}/status")]
async fn api_update_status(db: Db, path: Path<IdPath>, body: Json<StatusBody>) -> ApiResult {
    let game = db.transaction(|s| update_status(s, path.id, body.status))?;
    Ok(HttpResponse::Ok().json(game))
}
