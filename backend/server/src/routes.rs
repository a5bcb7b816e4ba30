use crate::handlers;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Trigger endpoint
        .route("/invoke", web::post().to(handlers::invoke))

        // Liveness
        .route("/health", web::get().to(handlers::health));
}
