use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Module, RosterRow};
use crate::services::{ReconcileService, RegisterService, RegisterSummary, ReloadStats};
use crate::state::AppState;

#[derive(Deserialize)]
struct ModuleQueryParams {
    kurskod: String,
    #[serde(rename = "onlyActive", default = "default_only_active")]
    only_active: bool,
}

fn default_only_active() -> bool {
    true
}

#[derive(Deserialize)]
struct ReloadRequest {
    kurskod: String,
    modulkod: String,
}

#[derive(Deserialize)]
struct GradeRequest {
    grade: String,
}

#[derive(Deserialize)]
struct DateRequest {
    date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    api_base: String,
    kurskod: Option<String>,
    modulkod: Option<String>,
    rows: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigResponse {
    grade_options: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/config", get(config))
        .route("/modules", get(list_modules))
        .route("/roster", get(list_roster))
        .route("/roster/reload", post(reload_roster))
        .route("/roster/{studentId}/select", patch(toggle_select))
        .route("/roster/{studentId}/grade", patch(set_grade))
        .route("/roster/{studentId}/date", patch(set_date))
        .route("/register", post(register_selected))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let store = state.store.read().await;
    let (kurskod, modulkod) = match store.context() {
        Some((k, m)) => (Some(k), Some(m)),
        None => (None, None),
    };
    Json(StatusResponse {
        api_base: state.config.api_base.clone(),
        kurskod,
        modulkod,
        rows: store.rows().len(),
    })
}

async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        grade_options: state.config.grade_options.clone(),
    })
}

async fn list_modules(
    State(state): State<AppState>,
    Query(params): Query<ModuleQueryParams>,
) -> Result<Json<Vec<Module>>, AppError> {
    let modules = state
        .epok
        .list_modules(&params.kurskod, params.only_active)
        .await?;
    Ok(Json(modules))
}

async fn list_roster(State(state): State<AppState>) -> Json<Vec<RosterRow>> {
    let store = state.store.read().await;
    Json(store.rows().to_vec())
}

async fn reload_roster(
    State(state): State<AppState>,
    Json(req): Json<ReloadRequest>,
) -> Result<Json<ReloadStats>, AppError> {
    let service = ReconcileService::new(
        state.canvas.clone(),
        state.studentits.clone(),
        state.ladok.clone(),
        state.store.clone(),
    );
    let stats = service.reload(&req.kurskod, &req.modulkod).await?;
    Ok(Json(stats))
}

async fn toggle_select(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<RosterRow>, AppError> {
    let row = state.store.write().await.toggle_selected(&student_id);
    row.map(Json).ok_or(AppError::NotFound)
}

async fn set_grade(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(req): Json<GradeRequest>,
) -> Result<Json<RosterRow>, AppError> {
    let row = state.store.write().await.set_grade(&student_id, &req.grade);
    row.map(Json).ok_or(AppError::NotFound)
}

async fn set_date(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(req): Json<DateRequest>,
) -> Result<Json<RosterRow>, AppError> {
    let row = state.store.write().await.set_date(&student_id, &req.date);
    row.map(Json).ok_or(AppError::NotFound)
}

async fn register_selected(
    State(state): State<AppState>,
) -> Result<Json<RegisterSummary>, AppError> {
    let service = RegisterService::new(state.ladok.clone(), state.store.clone());
    let summary = service.register_selected().await?;
    Ok(Json(summary))
}
