mod app;
mod reload;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reportfilters_core::{FilterRegistry, SharedRegistry, SystemClock};

use crate::app::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();

    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SERVER_PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("{}:{}", host, port);

    let index_path = PathBuf::from(
        std::env::var("REPORTS_INDEX").unwrap_or_else(|_| "config/reports/index.json".to_string()),
    );

    // 0 disables hot reload
    let refresh_interval = std::env::var("REFRESH_INTERVAL_SECONDS")
        .unwrap_or_else(|_| "0".to_string())
        .parse::<u64>()
        .unwrap_or(0);

    let registry = FilterRegistry::load(&index_path)?;
    let shared = SharedRegistry::new(registry);

    if refresh_interval > 0 {
        tokio::spawn(reload::run(
            shared.clone(),
            index_path.clone(),
            Duration::from_secs(refresh_interval),
        ));
    }

    let app = app::router(AppState {
        registry: shared,
        clock: Arc::new(SystemClock),
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("bind {bind_addr}"))?;
    tracing::info!("server running on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
