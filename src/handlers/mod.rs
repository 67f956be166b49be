pub mod dashboard;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // API (JSON for charts)
        .route("/api/dashboard", get(dashboard::dashboard_data))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
