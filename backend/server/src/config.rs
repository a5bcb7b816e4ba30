use open311_influx_services::DEFAULT_ENDPOINT;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub config_file: PathBuf,
    pub open311_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            config_file: env::var("CONFIG_FILE")
                .unwrap_or_else(|_| "config.json".to_string())
                .into(),
            open311_endpoint: env::var("OPEN311_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
        }
    }
}
