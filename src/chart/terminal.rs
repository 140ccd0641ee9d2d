use std::collections::HashMap;

use super::{ChartFrame, ChartSink};

/// Chart sink backing the terminal UI: keeps the latest frame per panel
/// until the next draw picks it up.
#[derive(Debug, Default)]
pub struct TerminalCharts {
    frames: HashMap<String, ChartFrame>,
    redraws: u64,
}

impl TerminalCharts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self, panel_id: &str) -> Option<&ChartFrame> {
        self.frames.get(panel_id)
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl ChartSink for TerminalCharts {
    fn redraw(&mut self, panel_id: &str, frame: ChartFrame) {
        self.frames.insert(panel_id.to_string(), frame);
        self.redraws = self.redraws.wrapping_add(1);
    }
}
