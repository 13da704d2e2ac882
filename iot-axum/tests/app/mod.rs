#![allow(dead_code)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use iot_axum::{
    AppState,
    auth::{SharedSecret, TokenValidator},
    config::AxumConfig,
    router,
};
use iot_core::models::{FieldValue, Row, WindowQuery};
use std::sync::Arc;
use time::OffsetDateTime;

mod store;
pub use store::MemoryStore;

pub const SECRET: &str = "8d1e0f7b53a2";

pub fn shared_secret() -> Option<Arc<dyn TokenValidator>> {
    Some(Arc::new(SharedSecret::new(SECRET)))
}

/// Serve `store` behind `validator` with the default server config.
pub fn serve(store: MemoryStore, validator: Option<Arc<dyn TokenValidator>>) -> TestServer {
    serve_with(store, validator, AxumConfig::default())
}

pub fn serve_with(
    store: MemoryStore,
    validator: Option<Arc<dyn TokenValidator>>,
    config: AxumConfig,
) -> TestServer {
    let state = AppState::new(store, WindowQuery::default(), validator);
    TestServer::new(router(state, &config)).unwrap()
}

pub fn bearer(credential: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {credential}")).unwrap()
}

/// A row shaped like the store's answer for one stored reading.
pub fn row(temp: f64, rh: f64, radiance: i64, unix: i64) -> Row {
    [
        ("location", FieldValue::String("lab".to_string())),
        ("measurement", FieldValue::String("readings".to_string())),
        ("radiance", FieldValue::Integer(radiance)),
        ("rh", FieldValue::Float(rh)),
        ("temp", FieldValue::Float(temp)),
        (
            "time",
            FieldValue::Timestamp(OffsetDateTime::from_unix_timestamp(unix).unwrap()),
        ),
    ]
    .into_iter()
    .map(|(column, value)| (column.to_string(), value))
    .collect()
}
