use crate::config::Config;
use anyhow::{Context, Result};
use open311_influx_services::{handle_invocation, InfluxSink, Open311Client, Pipeline};
use open311_influx_shared::InvocationResponse;
use tokio::io::AsyncReadExt;

pub struct WorkerService {
    pipeline: Pipeline<Open311Client, InfluxSink>,
    config: Config,
}

impl WorkerService {
    pub fn new(config: Config) -> Result<Self> {
        let source = Open311Client::new(config.open311_endpoint.clone())
            .context("Failed to initialize Open311 client")?;
        let pipeline = Pipeline::new(config.config_file.clone(), source, InfluxSink);

        Ok(Self { pipeline, config })
    }

    /// Run exactly one invocation and hand back its response.
    pub async fn run_once(&self) -> Result<InvocationResponse> {
        log::info!("Worker invocation starting:");
        log::info!("  - Config file: {}", self.config.config_file.display());
        log::info!("  - Open311 endpoint: {}", self.config.open311_endpoint);

        let event = if self.config.read_event {
            Self::read_event().await?
        } else {
            Vec::new()
        };

        Ok(handle_invocation(&self.pipeline, &event).await)
    }

    async fn read_event() -> Result<Vec<u8>> {
        let mut event = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut event)
            .await
            .context("Failed to read trigger event from stdin")?;
        Ok(event)
    }
}
