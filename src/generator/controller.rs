use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::source::ReadingSink;

use super::{generation_loop, GeneratorStats, ReadingSynth};

/// Owns the background generation task.
pub struct GeneratorController {
    handle: Option<JoinHandle<GeneratorStats>>,
    cancel_token: Option<CancellationToken>,
}

impl GeneratorController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start<K>(&mut self, sink: K, synth: ReadingSynth, period: Duration) -> Result<()>
    where
        K: ReadingSink + Send + Sync + 'static,
    {
        if self.handle.is_some() {
            bail!("generator already running");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(generation_loop(sink, synth, period, cancel_token.clone()));
        info!("generator started, one reading every {}ms", period.as_millis());

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel the loop and wait for it. Stopping an idle controller is a no-op.
    pub async fn stop(&mut self) -> Result<GeneratorStats> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        match self.handle.take() {
            Some(handle) => handle
                .await
                .context("generator loop task failed to join"),
            None => Ok(GeneratorStats::default()),
        }
    }
}

impl Default for GeneratorController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GeneratorConfig, testing::FakeStore};

    #[tokio::test(start_paused = true)]
    async fn start_then_stop_reports_stats() {
        let store = FakeStore::default();
        let config = GeneratorConfig::default();
        let mut controller = GeneratorController::new();

        controller
            .start(store.clone(), ReadingSynth::seeded(&config, 9), config.period())
            .unwrap();
        assert!(controller.is_running());
        assert!(controller
            .start(store.clone(), ReadingSynth::seeded(&config, 9), config.period())
            .is_err());

        tokio::time::sleep(Duration::from_millis(3_200)).await;
        let stats = controller.stop().await.unwrap();

        assert!(!controller.is_running());
        assert_eq!(stats.inserted, store.readings().len() as u64);
        assert!((3..=4).contains(&stats.inserted));
    }

    #[tokio::test]
    async fn stop_without_start_is_a_no_op() {
        let mut controller = GeneratorController::default();
        assert_eq!(controller.stop().await.unwrap(), GeneratorStats::default());
    }
}
