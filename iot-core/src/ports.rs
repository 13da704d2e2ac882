use crate::models::{Row, SensorReading, WindowQuery};

/// Repository interface for the time-series store.
///
/// Implementations hold a long-lived client and are cloned into every
/// request, so they must be cheap to clone and safe to use concurrently.
/// Each call is a single attempt: implementations do not retry.
pub trait ReadingRepository: Clone + Send + Sync + 'static {
    /// The error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert one reading as a single point.
    ///
    /// `location` is stored as a tag, `temp`/`rh`/`radiance` as fields,
    /// `measurement` names the series and `timestamp` is the point's time.
    fn write_reading(
        &self,
        reading: &SensorReading,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Return the rows matching `query`, in the order the store yields them.
    ///
    /// Rows are returned untyped; callers project them through a
    /// [`RowSchema`](crate::models::RowSchema).
    fn query_window(
        &self,
        query: &WindowQuery,
    ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send;
}
