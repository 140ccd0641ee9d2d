//! Reading data model.
//!
//! One timestamped temperature/humidity sample. Rows are append-only.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Row id assigned by the store; breaks ties between equal timestamps.
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, temperature: f64, humidity: f64) -> Self {
        Self {
            id: None,
            timestamp,
            temperature: round_one_decimal(temperature),
            humidity: round_one_decimal(humidity),
        }
    }
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
