use iot_core::{
    models::{Row, SensorReading, WindowQuery},
    ports::ReadingRepository,
};
use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

/// An in-memory store that records every call it receives.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub writes: Arc<Mutex<Vec<SensorReading>>>,
    pub queries: Arc<Mutex<Vec<WindowQuery>>>,
    pub rows: Arc<Mutex<Vec<Row>>>,
    pub fail: bool,
    pub delay: Option<Duration>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    async fn settle(&self) -> io::Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(io::Error::other("store unavailable"));
        }
        Ok(())
    }
}

impl ReadingRepository for MemoryStore {
    type Error = io::Error;

    async fn write_reading(&self, reading: &SensorReading) -> Result<(), Self::Error> {
        self.writes.lock().unwrap().push(reading.clone());
        self.settle().await
    }

    async fn query_window(&self, query: &WindowQuery) -> Result<Vec<Row>, Self::Error> {
        self.queries.lock().unwrap().push(query.clone());
        self.settle().await?;
        Ok(self.rows.lock().unwrap().clone())
    }
}
