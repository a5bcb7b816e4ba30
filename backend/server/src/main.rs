mod config;
mod handlers;
mod routes;

use actix_web::{web, App, HttpServer};
use config::Config;
use handlers::AppState;
use open311_influx_services::{InfluxSink, Open311Client, Pipeline};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();

    log::info!("Starting Open311 ingest gateway on {}:{}", config.server_host, config.server_port);
    log::info!("  - Config file: {}", config.config_file.display());
    log::info!("  - Open311 endpoint: {}", config.open311_endpoint);

    let source = Open311Client::new(config.open311_endpoint.clone())
        .map_err(std::io::Error::other)?;
    let app_state = web::Data::new(AppState {
        pipeline: Pipeline::new(config.config_file.clone(), source, InfluxSink),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind(format!("{}:{}", config.server_host, config.server_port))?
    .run()
    .await
}
