//! Periodic removal of temporary uploads that were never attached to a
//! category.

use std::sync::Arc;
use std::time::Duration;

use pressgrid_grid::GridController;
use tokio_util::sync::CancellationToken;

/// Run the purge loop until `cancel` is triggered.
pub async fn run(
    grid: Arc<GridController>,
    max_age: Duration,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        max_age_secs = max_age.as_secs(),
        interval_secs = every.as_secs(),
        "Upload purge job started"
    );

    let mut interval = tokio::time::interval(every.max(Duration::from_secs(1)));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Upload purge job stopping");
                break;
            }
            _ = interval.tick() => {
                match grid.purge_expired_uploads(max_age).await {
                    Ok(0) => tracing::debug!("Upload purge: nothing to remove"),
                    Ok(purged) => tracing::info!(purged, "Upload purge: removed expired uploads"),
                    Err(e) => tracing::error!(error = %e, "Upload purge failed"),
                }
            }
        }
    }
}
