use tokio::time::{self, Duration, Instant, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelStatus {
    #[default]
    Idle,
    Active,
}

/// Timer lifecycle of one panel. The ticker only exists while the panel is visible.
#[derive(Debug, Default)]
pub enum PanelState {
    #[default]
    Idle,
    Active { ticker: Interval },
}

impl PanelState {
    pub fn status(&self) -> PanelStatus {
        match self {
            PanelState::Idle => PanelStatus::Idle,
            PanelState::Active { .. } => PanelStatus::Active,
        }
    }

    /// Start ticking. The first tick lands one full `period` after `now`; the
    /// caller covers the moment of entry with its own refresh.
    pub fn activate(&mut self, period: Duration, now: Instant) {
        let mut ticker = time::interval_at(now + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        *self = PanelState::Active { ticker };
    }

    pub fn deactivate(&mut self) {
        *self = PanelState::Idle;
    }

    pub fn ticker_mut(&mut self) -> Option<&mut Interval> {
        match self {
            PanelState::Idle => None,
            PanelState::Active { ticker } => Some(ticker),
        }
    }
}
