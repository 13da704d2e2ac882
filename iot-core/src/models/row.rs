use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;
use time::OffsetDateTime;

/// A single typed cell of a query result.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text, including tag values
    String(String),
    /// A floating point field
    Float(f64),
    /// A signed integer field
    Integer(i64),
    /// A boolean field
    Boolean(bool),
    /// A point in time, such as the store's `time` column
    Timestamp(OffsetDateTime),
    /// An absent value
    Null,
}

impl FieldValue {
    /// The column type this value carries, or `None` for nulls.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Self::String(_) => Some(ColumnType::String),
            Self::Float(_) => Some(ColumnType::Float),
            Self::Integer(_) => Some(ColumnType::Integer),
            Self::Boolean(_) => Some(ColumnType::Boolean),
            Self::Timestamp(_) => Some(ColumnType::Timestamp),
            Self::Null => None,
        }
    }
}

/// The semantic type a column is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// See [`FieldValue::String`]
    String,
    /// See [`FieldValue::Float`]
    Float,
    /// See [`FieldValue::Integer`]
    Integer,
    /// See [`FieldValue::Boolean`]
    Boolean,
    /// See [`FieldValue::Timestamp`]
    Timestamp,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A result row whose columns did not match the expected schema.
///
/// The store schema is trusted, so this is a broken contract between the
/// service and the store rather than something a client can fix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaMismatch {
    /// The column is not present in the row
    #[error("column `{column}` is missing")]
    MissingColumn {
        /// The expected column
        column: &'static str,
    },
    /// The column holds a value of another type
    #[error("column `{column}` should be {expected} but is {}", describe(.found))]
    WrongType {
        /// The expected column
        column: &'static str,
        /// The type the schema requires
        expected: ColumnType,
        /// The type observed in the row, `None` for null
        found: Option<ColumnType>,
    },
}

impl SchemaMismatch {
    fn wrong_type(column: &'static str, expected: ColumnType, value: &FieldValue) -> Self {
        Self::WrongType {
            column,
            expected,
            found: value.column_type(),
        }
    }
}

fn describe(found: &Option<ColumnType>) -> String {
    found.map_or_else(|| "null".to_string(), |found| found.to_string())
}

/// One row returned by the store, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(pub IndexMap<String, FieldValue>);

impl Row {
    /// Look up a column by name.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.0.get(column)
    }

    fn remove(&mut self, column: &'static str) -> Result<FieldValue, SchemaMismatch> {
        self.0
            .shift_remove(column)
            .ok_or(SchemaMismatch::MissingColumn { column })
    }

    /// Take a string column.
    pub fn take_string(&mut self, column: &'static str) -> Result<String, SchemaMismatch> {
        match self.remove(column)? {
            FieldValue::String(value) => Ok(value),
            other => Err(SchemaMismatch::wrong_type(column, ColumnType::String, &other)),
        }
    }

    /// Take a float column.
    pub fn take_float(&mut self, column: &'static str) -> Result<f64, SchemaMismatch> {
        match self.remove(column)? {
            FieldValue::Float(value) => Ok(value),
            other => Err(SchemaMismatch::wrong_type(column, ColumnType::Float, &other)),
        }
    }

    /// Take an integer column.
    pub fn take_integer(&mut self, column: &'static str) -> Result<i64, SchemaMismatch> {
        match self.remove(column)? {
            FieldValue::Integer(value) => Ok(value),
            other => Err(SchemaMismatch::wrong_type(column, ColumnType::Integer, &other)),
        }
    }

    /// Take a timestamp column.
    pub fn take_timestamp(
        &mut self,
        column: &'static str,
    ) -> Result<OffsetDateTime, SchemaMismatch> {
        match self.remove(column)? {
            FieldValue::Timestamp(value) => Ok(value),
            other => Err(SchemaMismatch::wrong_type(column, ColumnType::Timestamp, &other)),
        }
    }
}

impl FromIterator<(String, FieldValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

/// The columns a row must carry, and their types.
///
/// Extra columns are allowed; the store may return more than a projection
/// needs (`SELECT *`).
#[derive(Debug, Clone, Copy)]
pub struct RowSchema(pub &'static [(&'static str, ColumnType)]);

impl RowSchema {
    /// Verify every expected column is present with the expected type.
    pub fn check(&self, row: &Row) -> Result<(), SchemaMismatch> {
        for &(column, expected) in self.0 {
            let value = row
                .get(column)
                .ok_or(SchemaMismatch::MissingColumn { column })?;
            if value.column_type() != Some(expected) {
                return Err(SchemaMismatch::wrong_type(column, expected, value));
            }
        }
        Ok(())
    }
}
