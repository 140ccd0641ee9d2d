//! Narrow interfaces between the poll/render core and the store behind it.
//!
//! The dashboard and the generator only ever talk to these traits; the
//! SQLite [`Database`] is the production implementation.

use std::future::Future;

use anyhow::Result;

use crate::db::{Database, Reading, Setpoint, SetpointField};

/// Read side used by the poll loop.
pub trait ReadingSource {
    /// Up to `limit` most recent readings, newest first.
    fn fetch_latest(&self, limit: usize) -> impl Future<Output = Result<Vec<Reading>>> + Send;
}

/// Write side used by the generator.
pub trait ReadingSink {
    fn append(&self, reading: Reading) -> impl Future<Output = Result<()>> + Send;
}

/// Point read/write of the singleton setpoint record.
pub trait SetpointStore {
    fn load_setpoint(&self) -> impl Future<Output = Result<Option<Setpoint>>> + Send;

    fn store_setpoint_field(
        &self,
        field: SetpointField,
        value: f64,
    ) -> impl Future<Output = Result<()>> + Send;

    fn seed_setpoint(&self, setpoint: Setpoint) -> impl Future<Output = Result<bool>> + Send;
}

impl ReadingSource for Database {
    fn fetch_latest(&self, limit: usize) -> impl Future<Output = Result<Vec<Reading>>> + Send {
        self.get_latest_readings(limit)
    }
}

impl ReadingSink for Database {
    async fn append(&self, reading: Reading) -> Result<()> {
        self.insert_reading(&reading).await.map(|_| ())
    }
}

impl SetpointStore for Database {
    fn load_setpoint(&self) -> impl Future<Output = Result<Option<Setpoint>>> + Send {
        self.get_setpoint()
    }

    fn store_setpoint_field(
        &self,
        field: SetpointField,
        value: f64,
    ) -> impl Future<Output = Result<()>> + Send {
        self.update_setpoint_field(field, value)
    }

    async fn seed_setpoint(&self, setpoint: Setpoint) -> Result<bool> {
        self.insert_setpoint_if_absent(&setpoint).await
    }
}
