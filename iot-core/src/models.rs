mod datapoint;
mod query;
mod reading;
mod row;

pub use datapoint::{DataResponse, QueriedDataPoint};
pub use query::WindowQuery;
pub use reading::{InvalidReading, SensorReading};
pub use row::{ColumnType, FieldValue, Row, RowSchema, SchemaMismatch};
