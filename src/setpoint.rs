//! Read/write access to the singleton setpoint record.

use anyhow::{anyhow, bail, Result};

use crate::{
    db::{Setpoint, SetpointField},
    source::SetpointStore,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Parse user-entered text into a setpoint value.
pub fn parse_setpoint_input(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("enter a number");
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| anyhow!("'{trimmed}' is not a number"))?;
    if !value.is_finite() {
        bail!("'{trimmed}' is not a finite number");
    }
    Ok(value)
}

pub struct SetpointAccessor<S> {
    store: S,
}

impl<S: SetpointStore> SetpointAccessor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current setpoint, or `None` if it was never initialized.
    pub async fn load(&self) -> Result<Option<Setpoint>> {
        self.store.load_setpoint().await.map_err(|err| {
            log_error!("failed to load setpoint: {err:#}");
            err
        })
    }

    /// Overwrite one field and commit. On error the stored value is unchanged.
    pub async fn save(&self, field: SetpointField, value: f64) -> Result<()> {
        if !value.is_finite() {
            bail!("{field} must be a finite number");
        }

        match self.store.store_setpoint_field(field, value).await {
            Ok(()) => {
                log_info!("setpoint {field} saved as {value:.1}");
                Ok(())
            }
            Err(err) => {
                log_error!("failed to save setpoint {field} = {value}: {err:#}");
                Err(err)
            }
        }
    }

    /// Validate raw user input, then save it. Bad input never reaches the store.
    pub async fn save_input(&self, field: SetpointField, input: &str) -> Result<f64> {
        let value = parse_setpoint_input(input).map_err(|err| {
            log_warn!("rejected {field} input '{input}': {err}");
            err
        })?;
        self.save(field, value).await?;
        Ok(value)
    }

    /// Create the record if it does not exist yet. Returns whether it was written.
    pub async fn initialize(&self, setpoint: Setpoint) -> Result<bool> {
        let inserted = self.store.seed_setpoint(setpoint).await?;
        if inserted {
            log_info!("setpoint initialized");
        }
        Ok(inserted)
    }
}
