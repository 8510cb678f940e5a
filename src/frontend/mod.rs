pub mod static_files;
pub mod templates;

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::time::Instant;

use crate::dashboard::SharedDashboard;

#[derive(Clone)]
pub struct FrontendState {
    pub dashboard: SharedDashboard,
    pub title: Arc<str>,
}

pub fn create_frontend_router(dashboard: SharedDashboard, title: &str) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .with_state(FrontendState {
            dashboard,
            title: Arc::from(title),
        })
        .merge(static_files::create_static_router())
}

async fn serve_index(State(state): State<FrontendState>) -> impl IntoResponse {
    let snapshot = state.dashboard.read().await.snapshot(Instant::now());
    Html(templates::render_dashboard(&state.title, &snapshot))
}
