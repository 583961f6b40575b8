//! API route handlers for the gateway.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use medtrack_core::dosage::{self, DosageSummary};
use medtrack_core::error::MedTrackError;
use medtrack_core::traits::Page;
use medtrack_core::types::{DoctorVacation, Drug, DrugUpdate, NewDrug, NewVacation, VacationUpdate};
use medtrack_core::{reorder, window};
use medtrack_scheduler::{TriggerKind, TriggerOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::AppState;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// A drug with its derived supply figures.
#[derive(Debug, Serialize)]
pub struct DrugView {
    #[serde(flatten)]
    pub drug: Drug,
    #[serde(flatten)]
    pub summary: DosageSummary,
}

impl DrugView {
    fn new(drug: Drug, state: &AppState) -> Self {
        let summary = dosage::compute(&drug, state.clock.today());
        Self { drug, summary }
    }
}

#[derive(Debug, Serialize)]
pub struct VacationView {
    #[serde(flatten)]
    pub vacation: DoctorVacation,
    pub is_current: bool,
    pub is_upcoming: bool,
    pub is_past: bool,
}

impl VacationView {
    fn new(vacation: DoctorVacation, state: &AppState) -> Self {
        let status = window::classify(&vacation, state.clock.today());
        Self {
            vacation,
            is_current: status.is_current(),
            is_upcoming: status.is_upcoming(),
            is_past: status.is_past(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RefillRequest {
    pub packages: u32,
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let engine = &state.engine;
    Json(serde_json::json!({
        "status": "ok",
        "service": "medtrack",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "notifier": engine.notifier_name(),
        "running": {
            "weekly": engine.is_running(TriggerKind::Weekly),
            "reorder": engine.is_running(TriggerKind::Reorder),
        }
    }))
}

// ── Drugs ─────────────────────────────────────────────

pub async fn create_drug(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewDrug>,
) -> ApiResult<(StatusCode, Json<DrugView>)> {
    let drug = state.store.create_drug(body).await?;
    Ok((StatusCode::CREATED, Json(DrugView::new(drug, &state))))
}

pub async fn list_drugs(
    State(state): State<Arc<AppState>>,
    ApiQuery(page): ApiQuery<Page>,
) -> ApiResult<Json<Vec<DrugView>>> {
    let drugs = state.store.list_drugs(page).await?;
    Ok(Json(drugs.into_iter().map(|d| DrugView::new(d, &state)).collect()))
}

pub async fn get_drug(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DrugView>> {
    let drug = state.store.get_drug(id).await?.ok_or_else(|| MedTrackError::drug_not_found(id))?;
    Ok(Json(DrugView::new(drug, &state)))
}

pub async fn update_drug(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<DrugUpdate>,
) -> ApiResult<Json<DrugView>> {
    let drug = state
        .store
        .update_drug(id, body)
        .await?
        .ok_or_else(|| MedTrackError::drug_not_found(id))?;
    Ok(Json(DrugView::new(drug, &state)))
}

pub async fn delete_drug(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if state.store.delete_drug(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MedTrackError::drug_not_found(id).into())
    }
}

pub async fn refill_drug(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<RefillRequest>,
) -> ApiResult<Json<DrugView>> {
    let drug = state
        .store
        .refill_drug(id, body.packages, state.clock.now_utc())
        .await?
        .ok_or_else(|| MedTrackError::drug_not_found(id))?;
    Ok(Json(DrugView::new(drug, &state)))
}

/// Drugs under the reorder threshold.
pub async fn reorder_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<DrugView>>> {
    let drugs = state.store.list_drugs(Page::all()).await?;
    let low: Vec<DrugView> = reorder::needing_reorder(&drugs)
        .into_iter()
        .cloned()
        .map(|d| DrugView::new(d, &state))
        .collect();
    Ok(Json(low))
}

// ── Doctor vacations ──────────────────────────────────

pub async fn create_vacation(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewVacation>,
) -> ApiResult<(StatusCode, Json<VacationView>)> {
    let vacation = state.store.create_vacation(body).await?;
    Ok((StatusCode::CREATED, Json(VacationView::new(vacation, &state))))
}

pub async fn list_vacations(
    State(state): State<Arc<AppState>>,
    ApiQuery(page): ApiQuery<Page>,
) -> ApiResult<Json<Vec<VacationView>>> {
    let vacations = state.store.list_vacations(page).await?;
    Ok(Json(vacations.into_iter().map(|v| VacationView::new(v, &state)).collect()))
}

/// The vacation covering today, or `null`.
pub async fn current_vacation(State(state): State<Arc<AppState>>) -> ApiResult<Json<Option<VacationView>>> {
    let vacations = state.store.list_vacations(Page::all()).await?;
    let current = window::find_current(&vacations, state.clock.today()).cloned();
    Ok(Json(current.map(|v| VacationView::new(v, &state))))
}

pub async fn get_vacation(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<VacationView>> {
    let vacation = state
        .store
        .get_vacation(id)
        .await?
        .ok_or_else(|| MedTrackError::vacation_not_found(id))?;
    Ok(Json(VacationView::new(vacation, &state)))
}

pub async fn update_vacation(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<VacationUpdate>,
) -> ApiResult<Json<VacationView>> {
    let vacation = state
        .store
        .update_vacation(id, body)
        .await?
        .ok_or_else(|| MedTrackError::vacation_not_found(id))?;
    Ok(Json(VacationView::new(vacation, &state)))
}

pub async fn delete_vacation(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if state.store.delete_vacation(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MedTrackError::vacation_not_found(id).into())
    }
}

// ── Reminders ─────────────────────────────────────────

fn trigger_response(kind: TriggerKind, outcome: TriggerOutcome) -> Json<serde_json::Value> {
    let message = match outcome {
        TriggerOutcome::Sent { drugs } => format!("{kind} reminder sent ({drugs} drug(s))"),
        TriggerOutcome::Skipped => format!("{kind} reminder skipped: nothing to report"),
    };
    Json(serde_json::json!({ "message": message, "trigger": kind, "outcome": outcome }))
}

pub async fn send_weekly_reminder(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let outcome = state.engine.run_weekly().await?;
    Ok(trigger_response(TriggerKind::Weekly, outcome))
}

pub async fn send_reorder_reminder(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let outcome = state.engine.run_reorder().await?;
    Ok(trigger_response(TriggerKind::Reorder, outcome))
}

pub async fn send_test_email(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    state.engine.send_test().await?;
    Ok(Json(serde_json::json!({ "message": "Test email sent" })))
}
