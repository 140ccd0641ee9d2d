use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::{chart::Metric, db::Reading, source::ReadingSource};

/// The most recent readings as parallel sequences, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayWindow {
    pub timestamps: Vec<DateTime<Utc>>,
    pub temperatures: Vec<f64>,
    pub humidities: Vec<f64>,
}

impl DisplayWindow {
    /// Build from rows as the source returns them (newest first).
    ///
    /// Rows are re-sorted by `(timestamp, id)` after reversing so the window
    /// stays ascending even if a source hands them back in another order.
    pub fn from_newest_first(mut rows: Vec<Reading>) -> Self {
        rows.reverse();
        rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

        let mut window = Self {
            timestamps: Vec::with_capacity(rows.len()),
            temperatures: Vec::with_capacity(rows.len()),
            humidities: Vec::with_capacity(rows.len()),
        };
        for reading in rows {
            window.timestamps.push(reading.timestamp);
            window.temperatures.push(reading.temperature);
            window.humidities.push(reading.humidity);
        }
        window
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Temperature => &self.temperatures,
            Metric::Humidity => &self.humidities,
        }
    }
}

/// Fetch the `window_size` most recent readings, oldest first.
pub async fn refresh<S: ReadingSource>(source: &S, window_size: usize) -> Result<DisplayWindow> {
    let rows = source
        .fetch_latest(window_size)
        .await
        .with_context(|| format!("failed to fetch latest {window_size} readings"))?;
    Ok(DisplayWindow::from_newest_first(rows))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn reading(id: i64, second: i64) -> Reading {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        Reading {
            id: Some(id),
            timestamp: base + Duration::seconds(second),
            temperature: 20.0 + second as f64,
            humidity: 40.0 + second as f64,
        }
    }

    #[test]
    fn reverses_newest_first_rows() {
        let window = DisplayWindow::from_newest_first(vec![
            reading(3, 3),
            reading(2, 2),
            reading(1, 1),
        ]);
        assert_eq!(window.temperatures, vec![21.0, 22.0, 23.0]);
        assert_eq!(window.humidities, vec![41.0, 42.0, 43.0]);
        assert!(window.timestamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn orders_rows_from_an_unordered_source() {
        let window = DisplayWindow::from_newest_first(vec![
            reading(2, 2),
            reading(3, 3),
            reading(1, 1),
        ]);
        assert_eq!(window.temperatures, vec![21.0, 22.0, 23.0]);
    }

    #[test]
    fn ties_follow_insertion_order() {
        let mut later = reading(7, 1);
        later.temperature = 99.0;
        let window = DisplayWindow::from_newest_first(vec![later, reading(6, 1)]);
        assert_eq!(window.temperatures, vec![21.0, 99.0]);
    }

    #[test]
    fn values_select_the_metric() {
        let window = DisplayWindow::from_newest_first(vec![reading(1, 1)]);
        assert_eq!(window.values(Metric::Temperature), &[21.0]);
        assert_eq!(window.values(Metric::Humidity), &[41.0]);
        assert_eq!(window.len(), 1);
    }
}
