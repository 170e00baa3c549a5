use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, RefreshResponse, UserRequest},
        extractors::{AuthUser, RefreshUser},
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
    },
    error::{Error, Result},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/api/users", post(register).put(update_user))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_credentials(payload: &UserRequest) -> Result<()> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(Error::BadRequest("Invalid email".into()));
    }
    if payload.password.is_empty() {
        return Err(Error::BadRequest("Password is required".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<UserRequest>,
) -> Result<(StatusCode, Json<PublicUser>)> {
    payload.email = payload.email.trim().to_string();
    validate_credentials(&payload)?;

    let user = state
        .store
        .create_user(&payload.email, &payload.password)
        .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(PublicUser {
            id: user.id,
            email: user.email,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    payload.email = payload.email.trim().to_string();

    let user = match state.store.get_user(&payload.email).await {
        Ok(u) => u,
        Err(Error::NotFound(_)) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(Error::Authentication);
        }
        Err(e) => return Err(e),
    };

    if let Err(e) = verify_password_blocking(&payload.password, &user.password_hash).await {
        warn!(user_id = user.id, "login invalid password");
        return Err(e);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_access(user.id, payload.expires_in_seconds)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        token,
        refresh_token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut payload): Json<UserRequest>,
) -> Result<Json<PublicUser>> {
    payload.email = payload.email.trim().to_string();
    validate_credentials(&payload)?;

    let hash = hash_password_blocking(&payload.password).await?;
    let user = state
        .store
        .update_user(user_id, &payload.email, &hash)
        .await?;

    info!(user_id, "user updated");
    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}

#[instrument(skip(state))]
pub async fn refresh(
    State(state): State<AppState>,
    RefreshUser(user_id): RefreshUser,
) -> Result<Json<RefreshResponse>> {
    match state.store.get_user_by_id(user_id).await {
        Ok(_) => {}
        Err(Error::NotFound(_)) => return Err(Error::Unauthorized("user not found".into())),
        Err(e) => return Err(e),
    }

    let token = JwtKeys::from_ref(&state).sign_access(user_id, None)?;
    Ok(Json(RefreshResponse { token }))
}
