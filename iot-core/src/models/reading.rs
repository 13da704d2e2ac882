use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

/// A single report from the microcontroller.
///
/// Every field except `timestamp` must be present and of the right JSON type,
/// otherwise decoding fails. Values are not range-checked: a relative
/// humidity of 140% is stored as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// The series the reading belongs to (the table name in the store)
    pub measurement: String,
    /// Where the sensor sits; stored as a tag
    pub location: String,
    /// Temperature in °C
    pub temp: f64,
    /// Relative humidity in %
    pub rh: f64,
    /// Raw radiance count
    pub radiance: i64,
    /// When the reading was taken. Defaults to the moment the body is decoded.
    #[serde(with = "time::serde::rfc3339", default = "OffsetDateTime::now_utc")]
    pub timestamp: OffsetDateTime,
}

/// A reading that decoded but cannot be stored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidReading {
    /// The series name is empty
    #[error("measurement must not be empty")]
    EmptyMeasurement,
}

impl SensorReading {
    /// Check the invariants that the JSON shape alone cannot express.
    pub fn validate(&self) -> Result<(), InvalidReading> {
        if self.measurement.is_empty() {
            return Err(InvalidReading::EmptyMeasurement);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn decodes_full_reading() {
        let body = r#"{"measurement":"m","location":"lab","temp":30.1,"rh":10.5,"radiance":11,"timestamp":"2024-01-01T00:00:00Z"}"#;
        let reading: SensorReading = serde_json::from_str(body).unwrap();
        assert_eq!(
            reading,
            SensorReading {
                measurement: "m".to_string(),
                location: "lab".to_string(),
                temp: 30.1,
                rh: 10.5,
                radiance: 11,
                timestamp: datetime!(2024-01-01 00:00:00 UTC),
            }
        );
        assert!(reading.validate().is_ok());
    }

    #[test]
    fn missing_timestamp_uses_arrival_time() {
        let before = OffsetDateTime::now_utc();
        let body = r#"{"measurement":"m","location":"lab","temp":1,"rh":2,"radiance":3}"#;
        let reading: SensorReading = serde_json::from_str(body).unwrap();
        let after = OffsetDateTime::now_utc();
        assert!(reading.timestamp >= before && reading.timestamp <= after);
    }

    #[test]
    fn rejects_wrong_types_and_missing_fields() {
        for body in [
            "",
            r#"{"measurement":69}"#,
            r#"{"measurement":"m","location":"lab","temp":"hot","rh":2,"radiance":3}"#,
            r#"{"measurement":"m","location":"lab","temp":1,"rh":2,"radiance":3.5}"#,
            r#"{"measurement":"m","location":"lab","temp":1,"rh":2,"radiance":3,"timestamp":null}"#,
            r#"{"measurement":"m","location":"lab","temp":1,"rh":2}"#,
            r#"{"measurement":"m","location":"lab","te"#,
        ] {
            assert!(
                serde_json::from_str::<SensorReading>(body).is_err(),
                "{body} should not decode"
            );
        }
    }

    #[test]
    fn empty_measurement_is_invalid() {
        let body = r#"{"measurement":"","location":"lab","temp":1,"rh":2,"radiance":3}"#;
        let reading: SensorReading = serde_json::from_str(body).unwrap();
        assert_eq!(reading.validate(), Err(InvalidReading::EmptyMeasurement));
    }
}
