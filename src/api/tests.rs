use super::*;
use crate::dashboard::{DashboardSnapshot, DashboardState, Readings, FETCH_ERROR_MESSAGE};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

async fn send(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn read_body<T>(response: Response) -> T
where
    T: serde::de::DeserializeOwned,
{
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn readings() -> Readings {
    Readings {
        balance_wei: 1_234_567_890_000_000_000,
        block_number: 19_000_000,
        chain_id: 1,
        nonce: 42,
        gas_price_wei: 21_500_000_000,
    }
}

#[tokio::test]
async fn test_snapshot_is_null_before_first_fetch() {
    let app = create_router(DashboardState::shared());

    let response = send(app, "/api/snapshot").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = read_body(response).await;
    for field in ["balance", "block_number", "chain_id", "nonce", "gas_price", "error"] {
        assert!(json[field].is_null(), "{} should be null", field);
    }
    assert_eq!(json["update_count"], 0);
    assert_eq!(json["loading"], false);
}

#[tokio::test]
async fn test_snapshot_after_fetch() {
    let dashboard = DashboardState::shared();
    dashboard.write().await.record_success(readings(), Utc::now());
    let app = create_router(dashboard);

    let snapshot: DashboardSnapshot = read_body(send(app, "/api/snapshot").await).await;

    assert_eq!(snapshot.balance.as_deref(), Some("1.235"));
    assert_eq!(snapshot.block_number.as_deref(), Some("19000000"));
    assert_eq!(snapshot.chain_id.as_deref(), Some("1"));
    assert_eq!(snapshot.nonce.as_deref(), Some("42"));
    assert_eq!(snapshot.gas_price.as_deref(), Some("21.500"));
    assert_eq!(snapshot.update_count, 1);
}

#[tokio::test]
async fn test_snapshot_reports_error() {
    let dashboard = DashboardState::shared();
    {
        let mut state = dashboard.write().await;
        state.record_success(readings(), Utc::now());
        state.record_failure();
    }
    let app = create_router(dashboard);

    let snapshot: DashboardSnapshot = read_body(send(app, "/api/snapshot").await).await;

    assert_eq!(snapshot.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
    assert_eq!(snapshot.balance.as_deref(), Some("1.235"));
}

#[tokio::test]
async fn test_health_ok() {
    let dashboard = DashboardState::shared();
    dashboard.write().await.record_success(readings(), Utc::now());
    let app = create_router(dashboard);

    let response = send(app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthStatus = read_body(response).await;
    assert_eq!(health.status, "ok");
    assert_eq!(health.update_count, 1);
    assert!(!health.last_fetch_failed);
}

#[tokio::test]
async fn test_health_unavailable_when_never_fetched() {
    let dashboard = DashboardState::shared();
    dashboard.write().await.record_failure();
    let app = create_router(dashboard);

    let response = send(app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json: Value = read_body(response).await;
    assert_eq!(json["error"], "No data fetched from the RPC endpoint yet");
    assert_eq!(json["error"], ApiError::Unavailable.to_string());
}
