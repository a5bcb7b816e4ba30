//! InfluxDB line protocol encoding.
//!
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp
//! ```
//!
//! See: <https://docs.influxdata.com/influxdb/v1/write_protocols/line_protocol_reference/>

use chrono::{DateTime, Utc};
use open311_influx_shared::{BatchPoints, Precision, TimeSeriesPoint};

/// Encode a whole batch, one line per point, in the batch precision.
pub fn encode_batch(batch: &BatchPoints) -> String {
    let mut lines = Vec::with_capacity(batch.points.len());
    for point in &batch.points {
        match encode_point(point, batch.precision) {
            Some(line) => lines.push(line),
            None => log::warn!("Skipping point in {} without fields", point.measurement),
        }
    }
    lines.join("\n")
}

/// Encode a single point. Returns `None` for a point with no fields, which
/// InfluxDB would reject.
///
/// Tags are written sorted by key; tags with empty values are left out.
/// The timestamp is truncated to the point's own precision and written in
/// `precision` units. A point without a timestamp is written without one.
pub fn encode_point(point: &TimeSeriesPoint, precision: Precision) -> Option<String> {
    if point.fields.is_empty() {
        return None;
    }

    let mut line = escape_measurement(&point.measurement);

    for (key, value) in &point.tags {
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&escape_key(value));
    }

    line.push(' ');
    for (i, (key, value)) in point.fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&value.to_line_protocol());
    }

    if let Some(timestamp) = point.timestamp {
        match scaled_timestamp(&timestamp, point.precision, precision) {
            Some(units) => {
                line.push(' ');
                line.push_str(&units.to_string());
            }
            None => log::warn!("Timestamp {} does not fit precision {}", timestamp, precision),
        }
    }

    Some(line)
}

fn scaled_timestamp(timestamp: &DateTime<Utc>, own: Precision, target: Precision) -> Option<i64> {
    let nanos = i128::from(timestamp.timestamp()) * 1_000_000_000
        + i128::from(timestamp.timestamp_subsec_nanos());
    let own_unit = i128::from(own.nanos_per_unit());
    let truncated = nanos.div_euclid(own_unit) * own_unit;

    i64::try_from(truncated.div_euclid(i128::from(target.nanos_per_unit()))).ok()
}

/// Measurement names escape commas and spaces.
fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

/// Tag keys, tag values and field keys escape commas, equals signs and spaces.
fn escape_key(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use open311_influx_shared::FieldValue;
    use std::collections::BTreeMap;

    fn point(timestamp: Option<DateTime<Utc>>) -> TimeSeriesPoint {
        TimeSeriesPoint {
            measurement: "service_requests".to_string(),
            tags: BTreeMap::from([
                ("status".to_string(), "open".to_string()),
                ("service_code".to_string(), "SBPOTREP".to_string()),
            ]),
            fields: BTreeMap::from([
                ("lat".to_string(), FieldValue::Float(30.2642)),
                ("address".to_string(), FieldValue::from("100 Congress Ave")),
            ]),
            timestamp,
            precision: Precision::Seconds,
        }
    }

    #[test]
    fn test_point_with_seconds_timestamp() {
        let t = Utc.with_ymd_and_hms(2020, 1, 15, 10, 30, 0).unwrap();
        let line = encode_point(&point(Some(t)), Precision::Seconds).expect("encode");

        assert_eq!(
            line,
            "service_requests,service_code=SBPOTREP,status=open address=\"100 Congress Ave\",lat=30.2642 1579084200"
        );
    }

    #[test]
    fn test_point_without_timestamp() {
        let line = encode_point(&point(None), Precision::Seconds).expect("encode");
        assert!(line.ends_with("lat=30.2642"));
    }

    #[test]
    fn test_timestamp_truncated_then_scaled() {
        let t = Utc.timestamp_opt(1_579_084_200, 750_000_000).unwrap();

        let seconds = encode_point(&point(Some(t)), Precision::Seconds).expect("encode");
        assert!(seconds.ends_with(" 1579084200"));

        // Point precision is seconds, so the sub-second part is dropped.
        let nanos = encode_point(&point(Some(t)), Precision::Nanoseconds).expect("encode");
        assert!(nanos.ends_with(" 1579084200000000000"));

        let mut millis_point = point(Some(t));
        millis_point.precision = Precision::Milliseconds;
        let millis = encode_point(&millis_point, Precision::Milliseconds).expect("encode");
        assert!(millis.ends_with(" 1579084200750"));
    }

    #[test]
    fn test_escaping_and_empty_tags() {
        let mut p = point(None);
        p.measurement = "civic requests,austin".to_string();
        p.tags.insert("service_name".to_string(), "Loose Dog, Stray=1".to_string());
        p.tags.insert("agency_responsible".to_string(), String::new());
        p.fields = BTreeMap::from([("status notes".to_string(), FieldValue::from("say \"hi\""))]);

        let line = encode_point(&p, Precision::Seconds).expect("encode");
        assert_eq!(
            line,
            "civic\\ requests\\,austin,service_code=SBPOTREP,service_name=Loose\\ Dog\\,\\ Stray\\=1,status=open status\\ notes=\"say \\\"hi\\\"\""
        );
    }

    #[test]
    fn test_point_without_fields_is_skipped() {
        let mut empty = point(None);
        empty.fields.clear();
        assert!(encode_point(&empty, Precision::Seconds).is_none());

        let batch = BatchPoints::new("civic", vec![point(None), empty, point(None)]);
        assert_eq!(encode_batch(&batch).lines().count(), 2);
    }

    #[test]
    fn test_batch_is_newline_separated() {
        let t = Utc.with_ymd_and_hms(2020, 1, 15, 10, 30, 0).unwrap();
        let batch = BatchPoints::new("civic", vec![point(Some(t)), point(None)]);
        let body = encode_batch(&batch);

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" 1579084200"));
        assert!(lines[1].ends_with("lat=30.2642"));
    }
}
