use axum::{routing::get, Router};

use super::handlers;
use crate::dashboard::SharedDashboard;

pub fn create_router(dashboard: SharedDashboard) -> Router {
    Router::new()
        .route("/api/snapshot", get(handlers::get_snapshot))
        .route("/api/health", get(handlers::get_health))
        .with_state(dashboard)
}
