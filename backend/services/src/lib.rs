pub mod config;
pub mod error;
pub mod handler;
pub mod influx;
pub mod line_protocol;
pub mod mapper;
pub mod open311_client;
pub mod pipeline;

#[cfg(test)]
mod test_support;

pub use config::Configuration;
pub use error::{ConfigError, FetchError, PipelineError, SinkError, Stage, TimestampParseError};
pub use handler::handle_invocation;
pub use influx::{InfluxClient, InfluxSink, PointSink};
pub use open311_client::{Open311Client, ServiceRequestSource, DEFAULT_ENDPOINT};
pub use pipeline::{EnvLookup, Pipeline, RunSummary};
