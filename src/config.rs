use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_ACCESS_TTL_SECONDS: i64 = 60 * 60 * 24;
pub const DEFAULT_REFRESH_TTL_SECONDS: i64 = 60 * 60 * 24 * 60;

/// Upper bound for configured token lifetimes (ten years).
pub const MAX_TTL_SECONDS: i64 = 60 * 60 * 24 * 365 * 10;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub db_path: String,
    pub filepath_root: String,
    pub banned_words: Vec<String>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from `lookup`, which returns the value for a variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .context("JWT_SECRET must be set")?,
            access_ttl_seconds: ttl_seconds(
                &lookup,
                "JWT_ACCESS_TTL_SECONDS",
                DEFAULT_ACCESS_TTL_SECONDS,
            )?,
            refresh_ttl_seconds: ttl_seconds(
                &lookup,
                "JWT_REFRESH_TTL_SECONDS",
                DEFAULT_REFRESH_TTL_SECONDS,
            )?,
        };
        let banned_words = lookup("CHIRPY_BANNED_WORDS")
            .map(|v| parse_word_list(&v))
            .unwrap_or_else(default_banned_words);

        Ok(Self {
            db_path: lookup("CHIRPY_DB_PATH").unwrap_or_else(|| "database.json".into()),
            filepath_root: lookup("CHIRPY_FILEPATH_ROOT").unwrap_or_else(|| ".".into()),
            banned_words,
            jwt,
        })
    }
}

pub fn default_banned_words() -> Vec<String> {
    vec!["kerfuffle".into(), "sharbert".into(), "fornax".into()]
}

fn ttl_seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: i64,
) -> anyhow::Result<i64> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let secs = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("{key} must be an integer number of seconds"))?;
    if !(1..=MAX_TTL_SECONDS).contains(&secs) {
        anyhow::bail!("{key} must be between 1 and {MAX_TTL_SECONDS} seconds, got {secs}");
    }
    Ok(secs)
}

fn parse_word_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
