use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use chirpy_db::Database;
use chirpy_types::error::CoreResult;
use chrono::Duration;

use crate::error::ApiResult;

pub type AppState = Arc<AppStateInner>;

/// Everything a handler needs, built once at startup.
pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub polka_key: String,
    pub access_token_ttl: Duration,
    /// Requests served from `/app`.
    pub file_server_hits: AtomicU64,
}

impl AppStateInner {
    pub fn new(
        db: Database,
        jwt_secret: String,
        polka_key: String,
        access_token_ttl: Duration,
    ) -> AppState {
        Arc::new(Self {
            db,
            jwt_secret,
            polka_key,
            access_token_ttl,
            file_server_hits: AtomicU64::new(0),
        })
    }
}

/// Run blocking store/hash work off the async runtime.
pub async fn run_blocking<F, T>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
