use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{ChirpRequest, ValidatedChirp};
use super::filter::{clean_body, is_too_long};
use crate::{
    error::{Error, Result},
    state::AppState,
    store::Chirp,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chirps", get(list_chirps))
        .route("/api/chirps/:chirp_id", get(get_chirp))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chirps", post(create_chirp))
        .route("/api/validate_chirp", post(validate_chirp))
}

fn checked_body(state: &AppState, body: &str) -> Result<String> {
    if is_too_long(body) {
        return Err(Error::BadRequest("Chirp is too long".into()));
    }
    Ok(clean_body(body, &state.config.banned_words))
}

#[instrument(skip(state, payload))]
pub async fn validate_chirp(
    State(state): State<AppState>,
    Json(payload): Json<ChirpRequest>,
) -> Result<Json<ValidatedChirp>> {
    let cleaned_body = checked_body(&state, &payload.body)?;
    Ok(Json(ValidatedChirp { cleaned_body }))
}

#[instrument(skip(state, payload))]
pub async fn create_chirp(
    State(state): State<AppState>,
    Json(payload): Json<ChirpRequest>,
) -> Result<(StatusCode, Json<Chirp>)> {
    let body = checked_body(&state, &payload.body)?;
    let chirp = state.store.create_chirp(&body).await?;
    info!(chirp_id = chirp.id, "chirp created");
    Ok((StatusCode::CREATED, Json(chirp)))
}

#[instrument(skip(state))]
pub async fn list_chirps(State(state): State<AppState>) -> Result<Json<Vec<Chirp>>> {
    Ok(Json(state.store.get_chirps().await?))
}

#[instrument(skip(state))]
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> Result<Json<Chirp>> {
    Ok(Json(state.store.get_chirp(&chirp_id).await?))
}
