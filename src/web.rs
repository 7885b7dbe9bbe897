use std::sync::Mutex;

use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DraftConfig;
use crate::logging::report_unmatched_events;
use crate::parser::{parse_action_log, parse_timestamp};
use crate::schedule::{
    calculate_draft_status, project_schedule, ActionEvent, ProjectedSlot, ScheduleOptions,
};

// Latest action log snapshot; replaced wholesale on upload
pub struct AppState {
    pub config: DraftConfig,
    pub events: Mutex<Vec<ActionEvent>>,
}

#[derive(Deserialize)]
pub struct NowQuery {
    /// Evaluate at this instant instead of the wall clock (RFC 3339)
    now: Option<String>,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    season_year: i32,
    slots: Vec<ProjectedSlot>,
}

struct Snapshot {
    now: DateTime<Utc>,
    order: Vec<String>,
    events: Vec<ActionEvent>,
    options: ScheduleOptions,
}

fn snapshot(query: &NowQuery, state: &AppState) -> Result<Snapshot> {
    let now = match query.now.as_deref() {
        Some(raw) => parse_timestamp(raw)
            .ok_or_else(|| actix_web::error::ErrorBadRequest(format!("Invalid 'now': {}", raw)))?,
        None => Utc::now(),
    };
    let options = state
        .config
        .schedule_options(now)
        .map_err(actix_web::error::ErrorInternalServerError)?;
    let order = state.config.rotation.rotation_order(options.season_year);
    let events = state
        .events
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Action log lock poisoned"))?
        .clone();
    Ok(Snapshot {
        now,
        order,
        events,
        options,
    })
}

// Current turn
async fn get_status(
    query: web::Query<NowQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let snap = snapshot(&query, &state)?;
    let status = calculate_draft_status(&snap.order, &snap.events, snap.now, &snap.options);
    Ok(HttpResponse::Ok().json(status))
}

// Every slot of the season
async fn get_schedule(
    query: web::Query<NowQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let snap = snapshot(&query, &state)?;
    let slots = project_schedule(&snap.order, &snap.events, snap.now, &snap.options);
    Ok(HttpResponse::Ok().json(ScheduleResponse {
        season_year: snap.options.season_year,
        slots,
    }))
}

// Replace the action log snapshot with an uploaded CSV
async fn upload_action_log(body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    match parse_action_log(&body) {
        Ok(events) => {
            let order = state
                .config
                .rotation_order(Utc::now())
                .map_err(actix_web::error::ErrorInternalServerError)?;
            let unmatched = report_unmatched_events(&order, &events);
            let count = events.len();

            *state.events.lock().map_err(|_| {
                actix_web::error::ErrorInternalServerError("Action log lock poisoned")
            })? = events;
            info!("Action log replaced with {} entries", count);

            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "events": count,
                "unmatched": unmatched,
            })))
        }
        Err(e) => {
            warn!("Rejected action log upload: {}", e);
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to process CSV: {}", e)
            })))
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/status", web::get().to(get_status))
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/upload", web::post().to(upload_action_log));
}

pub async fn start_server(config: DraftConfig, events: Vec<ActionEvent>) -> std::io::Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let app_state = web::Data::new(AppState {
        config,
        events: Mutex::new(events),
    });

    info!("Starting web server on {}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
