mod config;
mod worker_service;

use anyhow::Result;
use config::Config;
use std::process::ExitCode;
use worker_service::WorkerService;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();

    log::info!("Starting Open311 ingest worker");

    let worker_service = WorkerService::new(config)?;
    let response = worker_service.run_once().await?;

    println!("{}", serde_json::to_string(&response)?);

    if response.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
