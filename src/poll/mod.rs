//! Periodic poll-and-redraw of chart panels.

mod dashboard;
mod panel;
mod state;
mod window;

pub use dashboard::Dashboard;
pub use panel::{Panel, RefreshOutcome};
pub use state::{PanelState, PanelStatus};
pub use window::{refresh, DisplayWindow};
