#![warn(missing_docs)]
//! Core types for the sensor reading service.
//!
//! A microcontroller reports readings (temperature, relative humidity and
//! radiance) which are written to a time-series store, and a dashboard reads
//! back the most recent window of them. This crate holds the data that moves
//! through that path and the interface to the store; it knows nothing about
//! HTTP or about any particular database.

/// Domain models for the sensor reading service.
///
/// The models are plain data with a small amount of validation. Readings
/// arrive as [`models::SensorReading`], leave the store as untyped
/// [`models::Row`]s, and are projected into [`models::QueriedDataPoint`]s
/// through an explicit [`models::RowSchema`].
pub mod models;

/// Interface traits for the sensor reading service.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
/// Store adapters implement [`ports::ReadingRepository`]; the HTTP layer only
/// ever talks to that trait, which keeps the handlers testable against an
/// in-memory double.
pub mod ports;
