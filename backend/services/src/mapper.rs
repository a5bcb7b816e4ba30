use crate::error::TimestampParseError;
use chrono::{DateTime, Utc};
use open311_influx_shared::{FieldValue, Precision, ServiceRequest, TimeSeriesPoint};
use std::collections::BTreeMap;

/// Points produced from one fetch, index-aligned with the source records.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedBatch {
    pub points: Vec<TimeSeriesPoint>,
    /// Points whose requested time could not be parsed.
    pub untimestamped: usize,
}

/// Parse an Open311 `requested_datetime` and normalise it to UTC.
pub fn parse_requested_time(value: &str) -> Result<DateTime<Utc>, TimestampParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| TimestampParseError {
            value: value.to_string(),
            source,
        })
}

/// Map one service request onto one point in `measurement`.
///
/// Tags and fields are copied verbatim. An unparseable requested time is
/// logged and leaves the point without a timestamp.
pub fn map_request(request: &ServiceRequest, measurement: &str) -> TimeSeriesPoint {
    let timestamp = match parse_requested_time(&request.requested_datetime) {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("Service request {}: {}", request.service_request_id, e);
            None
        }
    };

    let tags = BTreeMap::from([
        ("service_request_id".to_string(), request.service_request_id.clone()),
        ("service_code".to_string(), request.service_code.clone()),
        ("service_name".to_string(), request.service_name.clone()),
        ("agency_responsible".to_string(), request.agency_responsible.clone()),
        ("status".to_string(), request.status.clone()),
    ]);

    let fields = BTreeMap::from([
        ("status_notes".to_string(), FieldValue::from(request.status_notes.as_str())),
        ("description".to_string(), FieldValue::from(request.description.as_str())),
        ("updated".to_string(), FieldValue::from(request.updated_datetime.as_str())),
        ("address".to_string(), FieldValue::from(request.address.as_str())),
        ("lat".to_string(), FieldValue::Float(request.lat)),
        ("long".to_string(), FieldValue::Float(request.long)),
    ]);

    TimeSeriesPoint {
        measurement: measurement.to_string(),
        tags,
        fields,
        timestamp,
        precision: Precision::Seconds,
    }
}

/// Map every request, preserving order. Never filters.
pub fn map_requests(requests: &[ServiceRequest], measurement: &str) -> MappedBatch {
    let points: Vec<TimeSeriesPoint> = requests
        .iter()
        .map(|request| {
            log::debug!("Mapping service request {}", request.service_request_id);
            map_request(request, measurement)
        })
        .collect();
    let untimestamped = points.iter().filter(|p| p.timestamp.is_none()).count();

    MappedBatch { points, untimestamped }
}
