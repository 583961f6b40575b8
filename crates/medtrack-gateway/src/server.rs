//! HTTP server: router assembly and startup.

use axum::routing::{get, post};
use axum::Router;
use medtrack_core::clock::Clock;
use medtrack_core::config::GatewayConfig;
use medtrack_core::error::Result;
use medtrack_core::traits::MedicationStore;
use medtrack_scheduler::ReminderEngine;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes;

/// Shared state for all handlers.
pub struct AppState {
    pub store: Arc<dyn MedicationStore>,
    pub engine: Arc<ReminderEngine>,
    pub clock: Arc<dyn Clock>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn MedicationStore>, engine: Arc<ReminderEngine>, clock: Arc<dyn Clock>) -> Self {
        Self { store, engine, clock, start_time: Instant::now() }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::health_check))
        .route("/drugs", post(routes::create_drug).get(routes::list_drugs))
        .route(
            "/drugs/{id}",
            get(routes::get_drug).put(routes::update_drug).delete(routes::delete_drug),
        )
        .route("/drugs/{id}/refill", post(routes::refill_drug))
        .route("/drugs-status/reorder", get(routes::reorder_status))
        .route("/doctor-vacations", post(routes::create_vacation).get(routes::list_vacations))
        .route("/doctor-vacations/current", get(routes::current_vacation))
        .route(
            "/doctor-vacations/{id}",
            get(routes::get_vacation).put(routes::update_vacation).delete(routes::delete_vacation),
        )
        .route("/send-weekly-reminder", post(routes::send_weekly_reminder))
        .route("/send-reorder-reminder", post(routes::send_reorder_reminder))
        .route("/test-email", post(routes::send_test_email))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn start(state: Arc<AppState>, config: &GatewayConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("🌐 Gateway listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gateway");
        })
        .await?;
    Ok(())
}
