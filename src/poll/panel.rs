use tokio::time::{Duration, Instant, Interval};

use crate::{
    chart::{ChartFrame, ChartSink},
    config::PanelConfig,
    source::ReadingSource,
};

use super::{refresh, PanelState, PanelStatus};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Redrawn { points: usize },
    /// The sink was left untouched.
    Failed { reason: String },
}

impl RefreshOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, RefreshOutcome::Failed { .. })
    }
}

/// One chart area with its own window size and refresh period.
#[derive(Debug)]
pub struct Panel {
    config: PanelConfig,
    state: PanelState,
    refreshes: u64,
}

impl Panel {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            state: PanelState::Idle,
            refreshes: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn period(&self) -> Duration {
        self.config.period()
    }

    pub fn status(&self) -> PanelStatus {
        self.state.status()
    }

    /// Refreshes attempted since creation, failed ones included.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    pub(crate) fn ticker_mut(&mut self) -> Option<&mut Interval> {
        self.state.ticker_mut()
    }

    /// Idle -> Active. Redraws once right away, then starts the timer.
    /// Returns `None` if the panel was already active.
    pub async fn enter<S, C>(&mut self, source: &S, sink: &mut C) -> Option<RefreshOutcome>
    where
        S: ReadingSource,
        C: ChartSink,
    {
        if self.status() == PanelStatus::Active {
            return None;
        }

        log_info!(
            "panel '{}' active: window {} every {}ms",
            self.config.id,
            self.config.window_size,
            self.config.refresh_ms
        );
        let outcome = self.refresh(source, sink).await;
        self.state.activate(self.period(), Instant::now());
        Some(outcome)
    }

    /// Active -> Idle. Returns whether the panel was active.
    pub fn leave(&mut self) -> bool {
        if self.status() == PanelStatus::Idle {
            return false;
        }
        self.state.deactivate();
        log_info!("panel '{}' idle", self.config.id);
        true
    }

    pub async fn refresh<S, C>(&mut self, source: &S, sink: &mut C) -> RefreshOutcome
    where
        S: ReadingSource,
        C: ChartSink,
    {
        self.refreshes = self.refreshes.wrapping_add(1);

        match refresh(source, self.config.window_size).await {
            Ok(window) => {
                let points = window.len();
                sink.redraw(&self.config.id, ChartFrame::from_window(&self.config, &window));
                log::debug!("panel '{}' redrawn with {points} points", self.config.id);
                RefreshOutcome::Redrawn { points }
            }
            Err(err) => {
                log_error!("panel '{}' refresh failed: {err:#}", self.config.id);
                RefreshOutcome::Failed {
                    reason: format!("{err:#}"),
                }
            }
        }
    }
}
