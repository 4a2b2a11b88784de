use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, instrument};

use super::service::TokenService;

/// Starts the background task that periodically removes expired blacklist entries.
/// A refresh token past its `exp` fails verification on its own, so its
/// blacklist row is no longer needed.
#[instrument(skip(service))]
pub async fn start_blacklist_cleanup_task(service: TokenService, cleanup_interval: Duration) {
    info!(
        cleanup_interval_secs = cleanup_interval.as_secs(),
        "Starting token blacklist cleanup background task"
    );

    let mut ticker = interval(cleanup_interval);

    loop {
        ticker.tick().await;
        run_blacklist_cleanup(&service).await;
    }
}

/// Runs one cleanup pass, logging the outcome. Returns the number of removed entries.
pub async fn run_blacklist_cleanup(service: &TokenService) -> u64 {
    match service.purge_expired().await {
        Ok(removed) => {
            info!(removed_count = removed, "Token blacklist cleanup completed");
            removed
        }
        Err(e) => {
            error!(error = %e, "Token blacklist cleanup failed");
            0
        }
    }
}
