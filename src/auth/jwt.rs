//! Signed, time-limited tokens.
//!
//! Access and refresh tokens share one HS256 secret and differ only by the
//! `iss` claim. Tokens are stateless: nothing is persisted and there is no
//! revocation, so a token stays valid until `exp` passes.

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::claims::{Claims, TokenKind};
use crate::error::{Error, Result};
use crate::state::AppState;

/// Sign a token for `subject` that expires `ttl` from now.
pub fn issue_token(issuer: &str, subject: u64, secret: &str, ttl: Duration) -> Result<String> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        iss: issuer.to_string(),
        sub: subject.to_string(),
        iat: now.unix_timestamp(),
        exp: (now + ttl).unix_timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Signing(e.to_string()))?;
    debug!(subject, issuer, "jwt signed");
    Ok(token)
}

/// Check signature and expiry and return the subject. The issuer is not checked.
pub fn validate_token(token: &str, secret: &str) -> Result<String> {
    decode_claims(token, secret).map(|claims| claims.sub)
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        warn!(error = %e, "jwt rejected");
        Error::Unauthorized("invalid or expired token".into())
    })?;
    Ok(data.claims)
}

/// Service-wide signing secret and default lifetimes.
#[derive(Clone)]
pub struct JwtKeys {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        Self {
            secret: jwt.secret.clone(),
            access_ttl: Duration::seconds(jwt.access_ttl_seconds),
            refresh_ttl: Duration::seconds(jwt.refresh_ttl_seconds),
        }
    }
}

impl JwtKeys {
    /// Access token; `requested_secs` may shorten the default lifetime but never extend it.
    pub fn sign_access(&self, user_id: u64, requested_secs: Option<i64>) -> Result<String> {
        let ttl = match requested_secs {
            Some(secs) if secs > 0 && Duration::seconds(secs) < self.access_ttl => {
                Duration::seconds(secs)
            }
            _ => self.access_ttl,
        };
        issue_token(TokenKind::Access.issuer(), user_id, &self.secret, ttl)
    }

    pub fn sign_refresh(&self, user_id: u64) -> Result<String> {
        issue_token(
            TokenKind::Refresh.issuer(),
            user_id,
            &self.secret,
            self.refresh_ttl,
        )
    }

    pub fn verify_access(&self, token: &str) -> Result<u64> {
        self.verify_kind(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<u64> {
        self.verify_kind(token, TokenKind::Refresh)
    }

    fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<u64> {
        let claims = decode_claims(token, &self.secret)?;
        if !claims.is_kind(kind) {
            warn!(issuer = %claims.iss, expected = kind.issuer(), "wrong token kind");
            return Err(Error::Unauthorized(format!(
                "{} token required",
                kind.issuer()
            )));
        }
        let user_id = claims
            .sub
            .parse::<u64>()
            .map_err(|_| Error::Unauthorized("invalid token subject".into()))?;
        debug!(user_id, kind = ?kind, "jwt verified");
        Ok(user_id)
    }
}
