use actix_web::{web, App, HttpServer};

/// Two requests as served by the Austin Open311 endpoint. The first has a
/// null description and no status notes.
pub(crate) const REQUESTS_FIXTURE: &str = r#"[
  {
    "service_request_id": "20-00012345",
    "status": "open",
    "service_name": "Pothole Repair",
    "service_code": "SBPOTREP",
    "agency_responsible": "Transportation & Public Works",
    "description": null,
    "requested_datetime": "2020-01-15T10:30:00Z",
    "updated_datetime": "2020-01-16T08:00:00Z",
    "address": "100 Congress Ave, Austin, TX 78701",
    "lat": 30.2642,
    "long": -97.7446
  },
  {
    "service_request_id": "20-00012346",
    "status": "closed",
    "service_name": "Loose Dog",
    "service_code": "ACLONAG",
    "agency_responsible": "Animal Services Office",
    "description": "Brown dog near the \"park\" entrance",
    "requested_datetime": "2020-01-15T04:45:12-06:00",
    "updated_datetime": "2020-01-15T12:00:00-06:00",
    "address": "2nd St & Lavaca St",
    "lat": 30.2655,
    "long": -97.7466,
    "status_notes": "Crew dispatched"
  }
]"#;

pub(crate) const CONFIG_FIXTURE: &str = r#"{
  "InfluxUsername": "ingest",
  "InfluxPassword": "s3cret",
  "InfluxHost": "http://127.0.0.1:8086",
  "InfluxDatabase": "civic",
  "InfluxMeasurement": "service_requests"
}"#;

/// Start an HTTP server on an ephemeral port and return its base URL.
pub(crate) fn spawn_server<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
{
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind test server");
    let addr = server.addrs()[0];

    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}
