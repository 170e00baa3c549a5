use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use super::jwt::JwtKeys;
use crate::error::Error;

/// Raw bearer token from the `Authorization` header.
pub fn bearer_token(parts: &Parts) -> Result<&str, Error> {
    let auth = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| Error::Unauthorized("missing Authorization header".into()))?;

    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Unauthorized("invalid auth scheme".into()))
}

/// User id from a valid access token.
pub struct AuthUser(pub u64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = JwtKeys::from_ref(state).verify_access(token)?;
        Ok(AuthUser(user_id))
    }
}

/// User id from a valid refresh token.
pub struct RefreshUser(pub u64);

#[async_trait]
impl<S> FromRequestParts<S> for RefreshUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = JwtKeys::from_ref(state).verify_refresh(token)?;
        Ok(RefreshUser(user_id))
    }
}
