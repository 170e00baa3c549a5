pub mod handlers;
mod metrics;

pub use metrics::Metrics;

use crate::state::AppState;
use axum::{middleware, Router};
use tower_http::services::ServeDir;

pub fn router() -> Router<AppState> {
    handlers::admin_routes()
}

/// Static files under `/app`, counting every request.
pub fn fileserver(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest_service("/app", ServeDir::new(&state.config.filepath_root))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::count_hits,
        ))
}
