use crate::admin::Metrics;
use crate::config::AppConfig;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Arc<AppConfig>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(Store::open(&config.db_path).await?);
        tracing::info!(path = %store.path().display(), "store opened");
        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<Store>, config: Arc<AppConfig>) -> Self {
        Self {
            store,
            config,
            metrics: Arc::new(Metrics::default()),
        }
    }

    #[cfg(test)]
    pub async fn fake() -> Self {
        use crate::config::{default_banned_words, JwtConfig};

        let db_path = crate::store::tests::temp_db_path();
        let store = Arc::new(Store::open(&db_path).await.expect("temp store opens"));
        let config = Arc::new(AppConfig {
            db_path: db_path.display().to_string(),
            filepath_root: std::env::temp_dir().display().to_string(),
            banned_words: default_banned_words(),
            jwt: JwtConfig {
                secret: "test".into(),
                access_ttl_seconds: crate::config::DEFAULT_ACCESS_TTL_SECONDS,
                refresh_ttl_seconds: crate::config::DEFAULT_REFRESH_TTL_SECONDS,
            },
        });
        Self::from_parts(store, config)
    }
}
