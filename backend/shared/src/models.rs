use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// One element of the Open311 GeoReport v2 `requests.json` array.
///
/// Every attribute is optional on the wire: an absent or null value decodes
/// to the type's zero value, so one sparse record never fails the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_request_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agency_responsible: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requested_datetime: String, // RFC3339
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_datetime: String, // RFC3339, kept verbatim
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lat: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub long: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_notes: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A value stored in a time-series field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    String(String),
    Boolean(bool),
}

impl FieldValue {
    /// Render the value the way InfluxDB line protocol expects it.
    ///
    /// - Float: shortest round-trip form (e.g. `30.26`)
    /// - Integer: suffixed with `i` (e.g. `42i`)
    /// - String: double quoted, with `\` and `"` escaped
    /// - Boolean: `true` or `false`
    pub fn to_line_protocol(&self) -> String {
        match self {
            FieldValue::Float(v) => format!("{}", v),
            FieldValue::Integer(v) => format!("{}i", v),
            FieldValue::String(v) => {
                let escaped = v.replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{}\"", escaped)
            }
            FieldValue::Boolean(v) => v.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line_protocol())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

/// Timestamp precision understood by the InfluxDB 1.x write endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl Precision {
    /// Value of the `precision` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Nanoseconds => "n",
            Precision::Microseconds => "u",
            Precision::Milliseconds => "ms",
            Precision::Seconds => "s",
            Precision::Minutes => "m",
            Precision::Hours => "h",
        }
    }

    pub fn nanos_per_unit(&self) -> i64 {
        match self {
            Precision::Nanoseconds => 1,
            Precision::Microseconds => 1_000,
            Precision::Milliseconds => 1_000_000,
            Precision::Seconds => 1_000_000_000,
            Precision::Minutes => 60 * 1_000_000_000,
            Precision::Hours => 3_600 * 1_000_000_000,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single measurement headed for the time-series database.
///
/// `timestamp` is `None` when the source time could not be parsed; such a
/// point is written without a timestamp and the database stamps it on arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub timestamp: Option<DateTime<Utc>>,
    pub precision: Precision,
}

/// Points written together in one request to one database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPoints {
    pub database: String,
    pub precision: Precision,
    pub points: Vec<TimeSeriesPoint>,
}

impl BatchPoints {
    /// Build a batch whose precision is the one shared by every point.
    /// Mixed precisions fall back to nanoseconds so no point loses resolution.
    pub fn new(database: impl Into<String>, points: Vec<TimeSeriesPoint>) -> Self {
        let precision = match points.first() {
            Some(first) if points.iter().all(|p| p.precision == first.precision) => first.precision,
            _ => Precision::Nanoseconds,
        };

        Self {
            database: database.into(),
            precision,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Response handed back to whatever triggered the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub const SUCCESS_BODY: &'static str = "Completed request successfully";

    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: Self::SUCCESS_BODY.to_string(),
        }
    }

    pub fn failure(reason: impl fmt::Display) -> Self {
        Self {
            status_code: 500,
            body: format!("Failed to complete request: {}", reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
