use std::sync::Arc;
use std::time::Duration;

use chirpy_api::state::AppStateInner;
use chrono::Utc;
use tracing::{info, warn};

/// Background task that prunes expired refresh tokens on an interval.
pub async fn run_cleanup_loop(state: Arc<AppStateInner>, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        let st = state.clone();
        let result =
            tokio::task::spawn_blocking(move || st.db.prune_expired_refresh_tokens(Utc::now()))
                .await;

        match result {
            Ok(Ok(count)) => {
                if count > 0 {
                    info!("Cleanup: pruned {} expired refresh tokens", count);
                }
            }
            Ok(Err(e)) => warn!("Cleanup error: {}", e),
            Err(e) => warn!("Cleanup task failed: {}", e),
        }
    }
}
