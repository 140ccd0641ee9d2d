use futures::future::select_all;

use crate::{chart::ChartSink, config::PanelConfig, source::ReadingSource};

use super::{Panel, RefreshOutcome};

/// Owns the panels, the data source they poll and the sink they draw into.
///
/// Everything runs on the caller's task: `next_tick` is awaited next to the
/// terminal event stream, so ticks never overlap each other or a key handler.
pub struct Dashboard<S, C> {
    source: S,
    charts: C,
    panels: Vec<Panel>,
}

impl<S, C> Dashboard<S, C>
where
    S: ReadingSource,
    C: ChartSink,
{
    pub fn new(source: S, charts: C, panels: Vec<PanelConfig>) -> Self {
        Self {
            source,
            charts,
            panels: panels.into_iter().map(Panel::new).collect(),
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    pub fn position(&self, panel_id: &str) -> Option<usize> {
        self.panels.iter().position(|panel| panel.id() == panel_id)
    }

    pub fn charts(&self) -> &C {
        &self.charts
    }

    /// Activate a panel. `None` for an unknown index or an already active panel.
    pub async fn enter(&mut self, index: usize) -> Option<RefreshOutcome> {
        let panel = self.panels.get_mut(index)?;
        panel.enter(&self.source, &mut self.charts).await
    }

    pub fn leave(&mut self, index: usize) -> bool {
        self.panels
            .get_mut(index)
            .map(Panel::leave)
            .unwrap_or(false)
    }

    pub fn leave_all(&mut self) {
        for panel in &mut self.panels {
            panel.leave();
        }
    }

    /// Refresh one panel now, whatever its state.
    pub async fn refresh(&mut self, index: usize) -> Option<RefreshOutcome> {
        let panel = self.panels.get_mut(index)?;
        Some(panel.refresh(&self.source, &mut self.charts).await)
    }

    /// Wait for the next tick of any active panel and return its index.
    /// Pends forever while every panel is idle.
    pub async fn next_tick(&mut self) -> usize {
        let ticks: Vec<_> = self
            .panels
            .iter_mut()
            .enumerate()
            .filter_map(|(index, panel)| {
                panel.ticker_mut().map(|ticker| {
                    Box::pin(async move {
                        ticker.tick().await;
                        index
                    })
                })
            })
            .collect();

        if ticks.is_empty() {
            return std::future::pending().await;
        }

        let (index, _, _) = select_all(ticks).await;
        index
    }
}
