use open311_influx_services::{handle_invocation, InfluxSink, Open311Client, Pipeline};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};

pub struct AppState {
    pub pipeline: Pipeline<Open311Client, InfluxSink>,
}

/// Run one ingest invocation. The request body is the trigger event and is ignored.
pub async fn invoke(state: web::Data<AppState>, event: web::Bytes) -> impl Responder {
    let response = handle_invocation(&state.pipeline, &event).await;

    let status = StatusCode::from_u16(response.status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body(response.body)
}

pub async fn health() -> impl Responder {
    "OK"
}
