//! Chart sink: what a panel hands over on every redraw.

mod frame;
mod terminal;
mod widget;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use terminal::TerminalCharts;
pub use widget::ChartFrameWidget;

/// Horizontal axis format for every panel.
pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Temperature,
    Humidity,
}

impl Metric {
    pub fn axis_label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature(℃)",
            Metric::Humidity => "Humidity(%)",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "℃",
            Metric::Humidity => "%",
        }
    }

    /// How far above a point its value label sits, in value units.
    pub fn label_offset(&self) -> f64 {
        match self {
            Metric::Temperature => 0.3,
            Metric::Humidity => 0.5,
        }
    }

    pub fn format_value(&self, value: f64) -> String {
        format!("{value:.1}{}", self.unit())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLabel {
    pub at: DateTime<Utc>,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub metric: Metric,
    pub points: Vec<(DateTime<Utc>, f64)>,
    pub labels: Vec<PointLabel>,
}

/// Complete contents of one panel. A redraw replaces the previous frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub title: String,
    pub x_label: String,
    pub time_format: String,
    pub series: Vec<Series>,
}

impl ChartFrame {
    pub fn point_count(&self) -> usize {
        self.series.first().map(|s| s.points.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}

pub trait ChartSink {
    fn redraw(&mut self, panel_id: &str, frame: ChartFrame);
}
