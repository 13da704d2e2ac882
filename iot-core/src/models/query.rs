use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The dashboard's read: everything from one location within a trailing
/// window, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WindowQuery {
    /// The series to read from
    #[serde(default = "default_measurement")]
    pub measurement: String,

    /// Only readings tagged with this location are returned
    #[serde(default = "default_location")]
    pub location: String,

    /// How far back from now to look
    #[serde(default = "default_window", with = "humantime_serde")]
    pub window: Duration,
}

fn default_measurement() -> String {
    "readings".to_string()
}

fn default_location() -> String {
    "lab".to_string()
}

fn default_window() -> Duration {
    Duration::from_secs(5 * 60)
}

impl Default for WindowQuery {
    fn default() -> Self {
        Self {
            measurement: default_measurement(),
            location: default_location(),
            window: default_window(),
        }
    }
}
