use crate::{config::PanelConfig, poll::DisplayWindow};

use super::{ChartFrame, PointLabel, Series, TIME_FORMAT};

impl ChartFrame {
    pub fn from_window(panel: &PanelConfig, window: &DisplayWindow) -> Self {
        let series = panel
            .metrics
            .iter()
            .map(|&metric| {
                let values = window.values(metric);
                let points: Vec<_> = window
                    .timestamps
                    .iter()
                    .copied()
                    .zip(values.iter().copied())
                    .collect();
                let labels = points
                    .iter()
                    .map(|&(at, value)| PointLabel {
                        at,
                        y: value + metric.label_offset(),
                        text: metric.format_value(value),
                    })
                    .collect();

                Series {
                    metric,
                    points,
                    labels,
                }
            })
            .collect();

        Self {
            title: panel.title.clone(),
            x_label: "Time".to_string(),
            time_format: TIME_FORMAT.to_string(),
            series,
        }
    }
}
