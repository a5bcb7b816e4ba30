use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage an invocation is in. Stages run strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Fetching,
    Mapping,
    Writing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loading => "loading",
            Stage::Fetching => "fetching",
            Stage::Mapping => "mapping",
            Stage::Writing => "writing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("config file {} must contain a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
    #[error("config does not match the expected fields: {source}")]
    Fields { source: serde_json::Error },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {source}")]
    Client { source: reqwest::Error },
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid InfluxDB host {host:?}: {reason}")]
    InvalidHost { host: String, reason: String },
    #[error("failed to connect to InfluxDB at {host}: {source}")]
    Connect { host: String, source: reqwest::Error },
    #[error("InfluxDB at {host} is unavailable (HTTP {status})")]
    Unavailable { host: String, status: u16 },
    #[error("failed to send batch to InfluxDB: {source}")]
    Write { source: reqwest::Error },
    #[error("InfluxDB rejected the batch (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Raised when a requested time is not RFC3339. Logged, never fatal.
#[derive(Debug, Error)]
#[error("cannot parse {value:?} as RFC3339: {source}")]
pub struct TimestampParseError {
    pub value: String,
    pub source: chrono::ParseError,
}

/// Any failure that aborts an invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config load failed: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("source fetch failed: {0}")]
    SourceFetch(FetchError),
    #[error("response decode failed: {0}")]
    Decode(FetchError),
    #[error("sink write failed: {0}")]
    SinkWrite(#[from] SinkError),
}

impl From<FetchError> for PipelineError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Decode { .. } => PipelineError::Decode(e),
            _ => PipelineError::SourceFetch(e),
        }
    }
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::ConfigLoad(_) => Stage::Loading,
            PipelineError::SourceFetch(_) | PipelineError::Decode(_) => Stage::Fetching,
            PipelineError::SinkWrite(_) => Stage::Writing,
        }
    }
}
