//! Single binary web server: the scheduling engine behind a JSON API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use competition_scheduler::{
    generate_schedule, record_result, reset_competition, Competition, CompetitionError,
    CompetitionFormat, CompetitionId, CompetitionStatus, GroupId, MatchId, ResultEntry,
    ScheduleSettings, TeamId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-competition entry: competition data + last activity time (for auto-cleanup).
struct CompetitionEntry {
    competition: Competition,
    last_activity: Instant,
}

/// In-memory state: many competitions by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<CompetitionId, CompetitionEntry>>>;

/// Inactivity threshold: competitions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateCompetitionBody {
    name: String,
    format: CompetitionFormat,
    start_date: DateTime<Utc>,
    #[serde(default = "default_match_duration")]
    match_duration_min: u32,
    #[serde(default = "default_break_duration")]
    break_duration_min: u32,
    #[serde(default)]
    max_matches_per_day: Option<u32>,
    #[serde(default = "default_points_for_win")]
    points_for_win: u32,
    #[serde(default = "default_points_for_draw")]
    points_for_draw: u32,
    #[serde(default)]
    points_for_loss: u32,
    #[serde(default)]
    overtime_enabled: bool,
    #[serde(default)]
    penalties_enabled: bool,
    #[serde(default)]
    group_stage: bool,
    #[serde(default)]
    third_place_match: bool,
}

fn default_match_duration() -> u32 {
    60
}

fn default_break_duration() -> u32 {
    15
}

fn default_points_for_win() -> u32 {
    3
}

fn default_points_for_draw() -> u32 {
    1
}

impl CreateCompetitionBody {
    fn settings(&self) -> ScheduleSettings {
        ScheduleSettings {
            start_date: self.start_date,
            match_duration_min: self.match_duration_min,
            break_duration_min: self.break_duration_min,
            max_matches_per_day: self.max_matches_per_day,
            points_for_win: self.points_for_win,
            points_for_draw: self.points_for_draw,
            points_for_loss: self.points_for_loss,
            overtime_enabled: self.overtime_enabled,
            penalties_enabled: self.penalties_enabled,
            group_stage: self.group_stage,
            third_place_match: self.third_place_match,
        }
    }
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
    #[serde(default)]
    seed: Option<u32>,
    #[serde(default)]
    group_id: Option<GroupId>,
}

#[derive(Deserialize)]
struct AddTeamsBody {
    names: Vec<String>,
}

#[derive(Deserialize)]
struct AddGroupBody {
    name: String,
}

#[derive(Deserialize)]
struct GenerateBody {
    #[serde(default)]
    venues: Vec<String>,
}

#[derive(Deserialize)]
struct SetStatusBody {
    status: CompetitionStatus,
}

/// Path segment: competition id (e.g. /api/competitions/{id})
#[derive(Deserialize)]
struct CompetitionPath {
    id: CompetitionId,
}

/// Path segments: competition id and team id.
#[derive(Deserialize)]
struct CompetitionTeamPath {
    id: CompetitionId,
    team_id: TeamId,
}

/// Path segments: competition id and match id.
#[derive(Deserialize)]
struct CompetitionMatchPath {
    id: CompetitionId,
    match_id: MatchId,
}

/// Map an engine error to the HTTP status its category calls for:
/// not-found 404, state conflicts 409, broken bracket data 500, the
/// remaining validation errors 400.
fn error_response(e: &CompetitionError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        CompetitionError::MatchNotFound(_)
        | CompetitionError::TeamNotFound(_)
        | CompetitionError::GroupNotFound(_) => HttpResponse::NotFound().json(body),
        CompetitionError::StatusConflict { .. }
        | CompetitionError::InvalidTransition { .. }
        | CompetitionError::UnresolvedParticipants { .. }
        | CompetitionError::MatchCancelled { .. }
        | CompetitionError::AlreadyCompleted { .. } => HttpResponse::Conflict().json(body),
        CompetitionError::CorruptBracket { .. } => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "competition-scheduler",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new competition (returns it with id; client stores id for subsequent requests).
#[post("/api/competitions")]
async fn api_create_competition(
    state: AppState,
    body: Json<CreateCompetitionBody>,
) -> HttpResponse {
    let competition = Competition::new(body.name.trim(), body.format, body.settings());
    let id = competition.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        CompetitionEntry {
            competition,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(&g.get(&id).unwrap().competition)
}

/// Get a competition by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/competitions/{id}")]
async fn api_get_competition(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.competition)
        }
        None => not_found(),
    }
}

/// Register a team (competition must not have started).
#[post("/api/competitions/{id}/teams")]
async fn api_add_team(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<AddTeamBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.add_team(body.name.trim(), body.seed, body.group_id) {
        Ok(_) => HttpResponse::Ok().json(c),
        Err(e) => error_response(&e),
    }
}

/// Bulk-add unseeded teams in registration order.
#[post("/api/competitions/{id}/teams/bulk")]
async fn api_add_teams(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<AddTeamsBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.add_teams(&body.names) {
        Ok(_) => HttpResponse::Ok().json(c),
        Err(e) => error_response(&e),
    }
}

/// Remove a team by id (competition must be in Draft).
#[delete("/api/competitions/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<CompetitionTeamPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.remove_team(path.team_id) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => error_response(&e),
    }
}

/// Add a group for a group-stage tournament.
#[post("/api/competitions/{id}/groups")]
async fn api_add_group(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<AddGroupBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.add_group(body.name.trim()) {
        Ok(_) => HttpResponse::Ok().json(c),
        Err(e) => error_response(&e),
    }
}

/// Generate (or regenerate) the schedule; advances the competition to Scheduled.
#[post("/api/competitions/{id}/generate")]
async fn api_generate(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<GenerateBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match generate_schedule(c, &body.venues) {
        Ok(()) => HttpResponse::Ok().json(c.schedule_view()),
        Err(e) => error_response(&e),
    }
}

/// Pure status transition (e.g. scheduled -> active before results come in).
#[put("/api/competitions/{id}/status")]
async fn api_set_status(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<SetStatusBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.transition_status(body.status) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => error_response(&e),
    }
}

/// Record a result for one match (competition must be Active).
#[put("/api/competitions/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<CompetitionMatchPath>,
    body: Json<ResultEntry>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match record_result(c, path.match_id, &body) {
        Ok(()) => HttpResponse::Ok().json(c.schedule_view()),
        Err(e) => error_response(&e),
    }
}

/// Reset the competition: all matches back to their generated shape, stats zeroed, status Draft.
#[post("/api/competitions/{id}/reset")]
async fn api_reset(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match reset_competition(c) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => error_response(&e),
    }
}

/// Read the schedule: matches ordered by round then sequence, names resolved.
#[get("/api/competitions/{id}/schedule")]
async fn api_get_schedule(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(entry.competition.schedule_view())
        }
        None => not_found(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(
        HashMap::<CompetitionId, CompetitionEntry>::new(),
    ));

    // Background task: every 30 minutes, remove competitions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive competition(s) (no activity for 12h)",
                    removed
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_competition)
            .service(api_get_competition)
            .service(api_add_team)
            .service(api_add_teams)
            .service(api_remove_team)
            .service(api_add_group)
            .service(api_generate)
            .service(api_set_status)
            .service(api_record_result)
            .service(api_reset)
            .service(api_get_schedule)
    })
    .bind(bind)?
    .run()
    .await
}
