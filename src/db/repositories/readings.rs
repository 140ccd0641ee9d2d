use anyhow::{Context, Result};
use rusqlite::{params, Row};

use crate::db::{
    helpers::{conversion_error, format_timestamp, parse_datetime, to_i64},
    models::Reading,
    Database,
};

fn row_to_reading(row: &Row) -> Result<Reading, rusqlite::Error> {
    let recorded_at: String = row.get("recorded_at")?;

    Ok(Reading {
        id: Some(row.get("id")?),
        timestamp: parse_datetime(&recorded_at, "recorded_at").map_err(conversion_error)?,
        temperature: row.get("temperature")?,
        humidity: row.get("humidity")?,
    })
}

impl Database {
    /// Append a reading and return the row id it was stored under.
    pub async fn insert_reading(&self, reading: &Reading) -> Result<i64> {
        let record = reading.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO readings (recorded_at, temperature, humidity)
                 VALUES (?1, ?2, ?3)",
                params![
                    format_timestamp(&record.timestamp),
                    record.temperature,
                    record.humidity,
                ],
            )
            .with_context(|| "failed to insert reading")?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// The `limit` most recent readings, newest first.
    pub async fn get_latest_readings(&self, limit: usize) -> Result<Vec<Reading>> {
        let limit = to_i64(limit)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, recorded_at, temperature, humidity
                 FROM readings
                 ORDER BY recorded_at DESC, id DESC
                 LIMIT ?1",
            )?;

            let readings = stmt
                .query_map(params![limit], row_to_reading)?
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| "failed to load latest readings")?;

            Ok(readings)
        })
        .await
    }

    pub async fn count_readings(&self) -> Result<u64> {
        self.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[tokio::test]
    async fn latest_readings_are_newest_first_and_limited() {
        let db = Database::in_memory().unwrap();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        for i in 1..=4 {
            let reading = Reading::new(base + Duration::seconds(i), 24.0 + i as f64, 50.0);
            db.insert_reading(&reading).await.unwrap();
        }

        let rows = db.get_latest_readings(3).await.unwrap();
        let seconds: Vec<i64> = rows
            .iter()
            .map(|r| (r.timestamp - base).num_seconds())
            .collect();
        assert_eq!(seconds, vec![4, 3, 2]);
        assert_eq!(rows[0].temperature, 28.0);
        assert!(rows.iter().all(|r| r.id.is_some()));
        assert_eq!(db.count_readings().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_insertion_order() {
        let db = Database::in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let first = db.insert_reading(&Reading::new(at, 24.0, 40.0)).await.unwrap();
        let second = db.insert_reading(&Reading::new(at, 25.0, 41.0)).await.unwrap();

        let rows = db.get_latest_readings(10).await.unwrap();
        assert_eq!(rows[0].id, Some(second));
        assert_eq!(rows[1].id, Some(first));
    }

    #[tokio::test]
    async fn zero_limit_returns_nothing() {
        let db = Database::in_memory().unwrap();
        db.insert_reading(&Reading::new(Utc::now(), 24.0, 40.0))
            .await
            .unwrap();
        assert!(db.get_latest_readings(0).await.unwrap().is_empty());
    }
}
