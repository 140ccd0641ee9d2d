//! In-memory fakes for the store and chart traits, shared by unit tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::{bail, Result};
use chrono::{Duration, TimeZone, Utc};

use crate::{
    chart::{ChartFrame, ChartSink},
    db::{Reading, Setpoint, SetpointField},
    source::{ReadingSink, ReadingSource, SetpointStore},
};

#[derive(Default)]
struct FakeState {
    readings: Vec<Reading>,
    setpoint: Option<Setpoint>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Cloneable store; clones share state so a test can flip failures mid-run.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    pub fn with_readings(readings: Vec<Reading>) -> Self {
        let store = Self::default();
        for reading in readings {
            store.push(reading);
        }
        store
    }

    pub fn push(&self, mut reading: Reading) {
        let mut state = self.state.lock().unwrap();
        reading.id = Some(state.readings.len() as i64 + 1);
        state.readings.push(reading);
    }

    pub fn readings(&self) -> Vec<Reading> {
        self.state.lock().unwrap().readings.clone()
    }

    pub fn setpoint(&self) -> Option<Setpoint> {
        self.state.lock().unwrap().setpoint.clone()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }
}

impl ReadingSource for FakeStore {
    async fn fetch_latest(&self, limit: usize) -> Result<Vec<Reading>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            bail!("connection refused");
        }
        Ok(state.readings.iter().rev().take(limit).cloned().collect())
    }
}

impl ReadingSink for FakeStore {
    async fn append(&self, reading: Reading) -> Result<()> {
        if self.state.lock().unwrap().fail_writes {
            bail!("disk full");
        }
        self.push(reading);
        Ok(())
    }
}

impl SetpointStore for FakeStore {
    async fn load_setpoint(&self) -> Result<Option<Setpoint>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            bail!("connection refused");
        }
        Ok(state.setpoint.clone())
    }

    async fn store_setpoint_field(&self, field: SetpointField, value: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            bail!("disk full");
        }
        match state.setpoint.as_mut() {
            Some(setpoint) => {
                match field {
                    SetpointField::Temperature => setpoint.target_temperature = value,
                    SetpointField::Humidity => setpoint.target_humidity = value,
                }
                Ok(())
            }
            None => bail!("setpoint has not been initialized"),
        }
    }

    async fn seed_setpoint(&self, setpoint: Setpoint) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.setpoint.is_some() {
            return Ok(false);
        }
        state.setpoint = Some(setpoint);
        Ok(true)
    }
}

/// Chart sink that remembers every frame it was given.
#[derive(Default)]
pub struct RecordingSink {
    frames: HashMap<String, Vec<ChartFrame>>,
}

impl RecordingSink {
    pub fn redraws_for(&self, panel_id: &str) -> usize {
        self.frames.get(panel_id).map(Vec::len).unwrap_or(0)
    }

    pub fn last_frame(&self, panel_id: &str) -> Option<&ChartFrame> {
        self.frames.get(panel_id).and_then(|frames| frames.last())
    }
}

impl ChartSink for RecordingSink {
    fn redraw(&mut self, panel_id: &str, frame: ChartFrame) {
        self.frames.entry(panel_id.to_string()).or_default().push(frame);
    }
}

/// `count` readings one second apart starting at 10:00:01 UTC.
pub fn readings_from(count: i64) -> Vec<Reading> {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    (1..=count)
        .map(|i| Reading::new(base + Duration::seconds(i), 24.0 + i as f64 / 10.0, 50.0))
        .collect()
}
