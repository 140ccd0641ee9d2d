//! Setpoint data model.
//!
//! A single target temperature/humidity record stored under a fixed key and
//! overwritten in place.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use chrono::{DateTime, Utc};

pub const SETPOINT_KEY: &str = "main";

#[derive(Debug, Clone, PartialEq)]
pub struct Setpoint {
    pub target_temperature: f64,
    pub target_humidity: f64,
    pub updated_at: DateTime<Utc>,
}

impl Setpoint {
    pub fn new(target_temperature: f64, target_humidity: f64) -> Self {
        Self {
            target_temperature,
            target_humidity,
            updated_at: Utc::now(),
        }
    }

    pub fn get(&self, field: SetpointField) -> f64 {
        match field {
            SetpointField::Temperature => self.target_temperature,
            SetpointField::Humidity => self.target_humidity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetpointField {
    Temperature,
    Humidity,
}

impl SetpointField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetpointField::Temperature => "temperature",
            SetpointField::Humidity => "humidity",
        }
    }

    /// Column backing this field. Only ever interpolated from this match.
    pub(crate) fn column(&self) -> &'static str {
        match self {
            SetpointField::Temperature => "target_temperature",
            SetpointField::Humidity => "target_humidity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SetpointField::Temperature => "℃",
            SetpointField::Humidity => "%",
        }
    }
}

impl fmt::Display for SetpointField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetpointField {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "temperature" => Ok(SetpointField::Temperature),
            "humidity" => Ok(SetpointField::Humidity),
            other => Err(anyhow!("unknown setpoint field '{other}'")),
        }
    }
}
