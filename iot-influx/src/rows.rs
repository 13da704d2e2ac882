//! Conversion of `query_sql` JSON rows into [`Row`]s.

use crate::Error;
use iot_core::models::{FieldValue, Row};
use serde_json::{Map, Value};
use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// The column influx uses for a point's time.
const TIME_COLUMN: &str = "time";

/// Convert one JSON object into a typed row, keeping column order.
pub(crate) fn decode(object: Map<String, Value>) -> Result<Row, Error> {
    object
        .into_iter()
        .map(|(column, value)| {
            let value = if column == TIME_COLUMN {
                timestamp(&column, value)?
            } else {
                field(value)
            };
            Ok::<_, Error>((column, value))
        })
        .collect()
}

fn field(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => n.as_f64().map_or(FieldValue::Null, FieldValue::Float),
        },
        Value::String(s) => FieldValue::String(s),
        other => FieldValue::String(other.to_string()),
    }
}

/// Influx renders `time` without an offset (always UTC); accept RFC3339 and
/// raw nanoseconds too.
fn timestamp(column: &str, value: Value) -> Result<FieldValue, Error> {
    let invalid = |value: &Value| Error::Timestamp {
        column: column.to_string(),
        value: value.to_string(),
    };
    let parsed = match &value {
        Value::Null => return Ok(FieldValue::Null),
        Value::String(s) => OffsetDateTime::parse(s, &Rfc3339).ok().or_else(|| {
            let naive = format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
            );
            PrimitiveDateTime::parse(s, naive)
                .ok()
                .map(PrimitiveDateTime::assume_utc)
        }),
        Value::Number(n) => n
            .as_i64()
            .and_then(|nanos| OffsetDateTime::from_unix_timestamp_nanos(nanos.into()).ok()),
        _ => None,
    };
    parsed
        .map(FieldValue::Timestamp)
        .ok_or_else(|| invalid(&value))
}
