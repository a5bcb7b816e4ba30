use open311_influx_services::DEFAULT_ENDPOINT;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub config_file: PathBuf,
    pub open311_endpoint: String,

    // Read a trigger event from stdin before running
    pub read_event: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let config_file = env::var("CONFIG_FILE")
            .unwrap_or_else(|_| "config.json".to_string())
            .into();

        let open311_endpoint = env::var("OPEN311_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let read_event = env::var("WORKER_READ_EVENT")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            config_file,
            open311_endpoint,
            read_event,
        }
    }
}
