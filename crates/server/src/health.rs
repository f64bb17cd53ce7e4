use axum::Json;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the application start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// `configured` once backend settings were found, `missing` otherwise.
    pub backend: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    let backend = if crate::backend::is_configured() || crate::backend::init_backend() {
        "configured"
    } else {
        "missing"
    };

    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        backend: backend.to_string(),
        uptime_seconds: uptime,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Router exposing the health endpoint, merged into the app router.
pub fn health_router() -> axum::Router {
    axum::Router::new().route("/health", axum::routing::get(health_check))
}
