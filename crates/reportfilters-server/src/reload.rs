use std::path::{Path, PathBuf};
use std::time::Duration;

use reportfilters_core::{FilterRegistry, SharedRegistry};

/// Re-reads the report config every `interval` and publishes it.
pub async fn run(shared: SharedRegistry, index_path: PathBuf, interval: Duration) {
    loop {
        tokio::time::sleep(interval).await;
        reload_once(&shared, &index_path);
    }
}

/// Returns whether a new registry was published. On failure the current one stays in service.
pub fn reload_once(shared: &SharedRegistry, index_path: &Path) -> bool {
    match FilterRegistry::load(index_path) {
        Ok(registry) => {
            let reports = registry.len();
            shared.replace(registry);
            tracing::info!(reports, "reloaded report filters");
            true
        }
        Err(e) => {
            tracing::error!("failed to reload report filters from {}: {e:#}", index_path.display());
            false
        }
    }
}
