use axum::{extract::State, Json};
use tokio::time::Instant;

use super::types::{ApiError, HealthStatus};
use crate::dashboard::{DashboardSnapshot, SharedDashboard};

pub async fn get_snapshot(
    State(dashboard): State<SharedDashboard>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    let snapshot = dashboard.read().await.snapshot(Instant::now());
    Ok(Json(snapshot))
}

pub async fn get_health(
    State(dashboard): State<SharedDashboard>,
) -> Result<Json<HealthStatus>, ApiError> {
    let dashboard = dashboard.read().await;
    if dashboard.update_count() == 0 && dashboard.error().is_some() {
        return Err(ApiError::Unavailable);
    }

    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        update_count: dashboard.update_count(),
        last_fetch_failed: dashboard.error().is_some(),
    }))
}
