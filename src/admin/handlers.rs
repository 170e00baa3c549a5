use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, Response},
    routing::get,
    Router,
};
use tracing::{info, instrument};

use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/healthz", get(readiness))
        .route("/api/metrics", get(metrics))
        .route("/api/reset", get(reset).post(reset))
}

pub async fn readiness() -> &'static str {
    "OK"
}

#[instrument(skip(state))]
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {} times!</p></body></html>",
        state.metrics.hits()
    ))
}

#[instrument(skip(state))]
pub async fn reset(State(state): State<AppState>) -> &'static str {
    state.metrics.reset();
    info!("fileserver hit counter reset");
    "OK"
}

pub async fn count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.metrics.hit();
    next.run(req).await
}
