use std::sync::Arc;

use anyhow::{bail, Result};

use sweeper_core::credentials;
use sweeper_core::server::SweepResponse;
use sweeper_core::timeline::{TimelineConnector, TwitterConnector};
use sweeper_core::{AppConfig, RetentionPolicy, SweepOptions, Sweeper};

/// Run a single sweep in-process and print the result as JSON
pub async fn run(config: Arc<AppConfig>, options: SweepOptions) -> Result<()> {
    let provider = credentials::from_config(&config).await?;
    let creds = provider.credentials().await?;
    let timeline = TwitterConnector::new(config.twitter.clone())
        .connect(creds)
        .await?;

    let policy = Arc::new(RetentionPolicy::from_config(&config.retention));
    let result = Sweeper::new(timeline, policy)
        .with_page_size(config.twitter.page_size)
        .run(options)
        .await;

    let response = SweepResponse::from(result);
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.error.is_empty() {
        bail!("Sweep stopped early: {}", response.error);
    }
    Ok(())
}
