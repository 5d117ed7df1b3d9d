use axum::Json;
use axum::extract::State;

use crate::models::health::HealthResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Service health",
    description = "Always returns 200. Reports whether the database is reachable and whether email delivery is configured.",
    responses(
        (status = 200, description = "Health report", body = HealthResponse),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    // Re-check a database marked down instead of reporting a stale flag.
    let connected = state.db.is_available() || state.db.ping().await;

    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now(),
        database: if connected {
            "connected"
        } else {
            "disconnected"
        },
        mailgun: if state.notifier.is_configured() {
            "configured"
        } else {
            "not configured"
        },
        version: env!("CARGO_PKG_VERSION"),
    })
}
