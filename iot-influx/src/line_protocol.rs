//! Line-protocol encoding for a single reading.

use iot_core::models::SensorReading;
use std::fmt::Write as _;

/// Encode `reading` as one line-protocol record with nanosecond precision.
///
/// `location` becomes the only tag; `temp` and `rh` are float fields and
/// `radiance` an integer field.
pub(crate) fn encode(reading: &SensorReading) -> String {
    let mut line = String::with_capacity(96);
    escape_into(&mut line, &reading.measurement, &[',', ' ']);
    // influx drops empty tags, so don't send one
    if !reading.location.is_empty() {
        line.push_str(",location=");
        escape_into(&mut line, &reading.location, &[',', '=', ' ']);
    }
    let _ = write!(
        line,
        " temp={},rh={},radiance={}i {}",
        reading.temp,
        reading.rh,
        reading.radiance,
        reading.timestamp.unix_timestamp_nanos()
    );
    line
}

fn escape_into(out: &mut String, value: &str, special: &[char]) {
    for c in value.chars() {
        if c == '\n' {
            // a raw newline would start a second record
            out.push_str("\\n");
            continue;
        }
        if c == '\\' || special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}
