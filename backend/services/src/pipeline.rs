use crate::config::{self, Configuration};
use crate::error::{PipelineError, Stage};
use crate::influx::PointSink;
use crate::mapper;
use crate::open311_client::ServiceRequestSource;
use open311_influx_shared::BatchPoints;
use std::path::{Path, PathBuf};

/// What one successful invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub written: usize,
    pub untimestamped: usize,
}

/// Load → fetch → map → write, once per call to [`Pipeline::run`].
///
/// Holds no state between runs: the config file is read again and a new
/// sink connection is opened every time.
pub struct Pipeline<S, K> {
    config_path: PathBuf,
    env: EnvLookup,
    source: S,
    sink: K,
}

/// Resolves config overrides by key name.
pub type EnvLookup = fn(&str) -> Option<String>;

impl<S, K> Pipeline<S, K>
where
    S: ServiceRequestSource,
    K: PointSink,
{
    pub fn new(config_path: impl Into<PathBuf>, source: S, sink: K) -> Self {
        Self {
            config_path: config_path.into(),
            env: config::process_env,
            source,
            sink,
        }
    }

    /// Replace the process environment as the source of config overrides.
    pub fn with_env_lookup(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        log::info!("Stage {}: {}", Stage::Loading, self.config_path.display());
        let config = Configuration::load_with_env(&self.config_path, self.env)?;
        self.run_with_config(&config).await
    }

    /// Run the remaining stages against an already loaded configuration.
    pub async fn run_with_config(&self, config: &Configuration) -> Result<RunSummary, PipelineError> {
        log::info!("Stage {}", Stage::Fetching);
        let requests = self.source.fetch_requests().await?;

        log::info!("Stage {}: {} requests into {}", Stage::Mapping, requests.len(), config.influx_measurement);
        let mapped = mapper::map_requests(&requests, &config.influx_measurement);
        if mapped.untimestamped > 0 {
            log::warn!(
                "{} of {} points have no requested time and will be stamped on write",
                mapped.untimestamped,
                mapped.points.len()
            );
        }

        let batch = BatchPoints::new(config.influx_database.clone(), mapped.points);
        log::info!("Stage {}: {} points into {}", Stage::Writing, batch.len(), batch.database);
        self.sink.write_batch(config, &batch).await?;

        Ok(RunSummary {
            fetched: requests.len(),
            written: batch.len(),
            untimestamped: mapped.untimestamped,
        })
    }
}
