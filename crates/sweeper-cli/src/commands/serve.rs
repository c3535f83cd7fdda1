use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use sweeper_core::{server, AppConfig};

/// Run the HTTP trigger until Ctrl+C
pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let port = config.listen_port();
    let state = server::AppState::from_config(&config).await?;

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
    };

    server::serve(state, port, shutdown).await?;
    Ok(())
}
