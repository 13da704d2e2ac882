use super::{ColumnType, Row, RowSchema, SchemaMismatch};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored reading as the dashboard sees it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueriedDataPoint {
    /// Where the sensor sits
    pub location: String,
    /// Temperature in °C
    pub temp: f64,
    /// Relative humidity in %
    pub rh: f64,
    /// Raw radiance count
    pub radiance: i64,
    /// When the reading was taken
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

impl QueriedDataPoint {
    /// The columns a result row must provide to become a data point.
    pub const SCHEMA: RowSchema = RowSchema(&[
        ("location", ColumnType::String),
        ("temp", ColumnType::Float),
        ("rh", ColumnType::Float),
        ("radiance", ColumnType::Integer),
        ("time", ColumnType::Timestamp),
    ]);
}

impl TryFrom<Row> for QueriedDataPoint {
    type Error = SchemaMismatch;

    fn try_from(mut row: Row) -> Result<Self, Self::Error> {
        Self::SCHEMA.check(&row)?;
        Ok(Self {
            location: row.take_string("location")?,
            temp: row.take_float("temp")?,
            rh: row.take_float("rh")?,
            radiance: row.take_integer("radiance")?,
            time: row.take_timestamp("time")?,
        })
    }
}

/// The body of a successful dashboard query: `{"data": [...]}`.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct DataResponse {
    /// Data points in the order the store returned them
    pub data: Vec<QueriedDataPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use time::macros::datetime;

    fn lab_row(temp: FieldValue) -> Row {
        [
            ("location", FieldValue::String("lab".to_string())),
            ("measurement", FieldValue::String("ignored".to_string())),
            ("temp", temp),
            ("rh", FieldValue::Float(10.5)),
            ("radiance", FieldValue::Integer(11)),
            ("time", FieldValue::Timestamp(datetime!(2024-01-01 00:00:00 UTC))),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn projects_typed_row() {
        let point = QueriedDataPoint::try_from(lab_row(FieldValue::Float(30.1))).unwrap();
        assert_eq!(
            point,
            QueriedDataPoint {
                location: "lab".to_string(),
                temp: 30.1,
                rh: 10.5,
                radiance: 11,
                time: datetime!(2024-01-01 00:00:00 UTC),
            }
        );
    }

    #[test]
    fn mistyped_row_is_a_contract_violation() {
        let err = QueriedDataPoint::try_from(lab_row(FieldValue::String("hot".into())))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaMismatch::WrongType {
                column: "temp",
                expected: ColumnType::Float,
                found: Some(ColumnType::String),
            }
        );
    }

    #[test]
    fn response_survives_json() {
        let response = DataResponse {
            data: vec![
                QueriedDataPoint::try_from(lab_row(FieldValue::Float(30.1))).unwrap(),
                QueriedDataPoint::try_from(lab_row(FieldValue::Float(-4.0))).unwrap(),
            ],
        };
        let body = serde_json::to_vec(&response).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"][0]["time"], "2024-01-01T00:00:00Z");
        assert_eq!(json["data"][1]["temp"], -4.0);

        let decoded: DataResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn empty_response_is_an_empty_array() {
        let body = serde_json::to_string(&DataResponse::default()).unwrap();
        assert_eq!(body, r#"{"data":[]}"#);
    }
}
