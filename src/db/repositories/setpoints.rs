use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    helpers::{conversion_error, format_timestamp, parse_datetime},
    models::{Setpoint, SetpointField, SETPOINT_KEY},
    Database,
};

fn row_to_setpoint(row: &Row) -> Result<Setpoint, rusqlite::Error> {
    let updated_at: String = row.get("updated_at")?;

    Ok(Setpoint {
        target_temperature: row.get("target_temperature")?,
        target_humidity: row.get("target_humidity")?,
        updated_at: parse_datetime(&updated_at, "updated_at").map_err(conversion_error)?,
    })
}

impl Database {
    /// Get the singleton setpoint, `None` if it was never initialized.
    pub async fn get_setpoint(&self) -> Result<Option<Setpoint>> {
        self.execute(|conn| {
            let setpoint = conn
                .query_row(
                    "SELECT target_temperature, target_humidity, updated_at
                     FROM setpoints
                     WHERE id = ?1",
                    params![SETPOINT_KEY],
                    row_to_setpoint,
                )
                .optional()
                .with_context(|| "failed to load setpoint")?;
            Ok(setpoint)
        })
        .await
    }

    /// Overwrite one field of the singleton setpoint.
    ///
    /// Fails without touching anything when the record does not exist yet.
    pub async fn update_setpoint_field(&self, field: SetpointField, value: f64) -> Result<()> {
        self.execute(move |conn| {
            let sql = format!(
                "UPDATE setpoints SET {} = ?1, updated_at = ?2 WHERE id = ?3",
                field.column()
            );
            let affected = conn
                .execute(
                    &sql,
                    params![value, format_timestamp(&Utc::now()), SETPOINT_KEY],
                )
                .with_context(|| format!("failed to update setpoint {field}"))?;

            if affected == 0 {
                bail!("setpoint '{SETPOINT_KEY}' has not been initialized");
            }
            Ok(())
        })
        .await
    }

    /// Insert the setpoint unless one already exists. Returns whether a row was written.
    pub async fn insert_setpoint_if_absent(&self, setpoint: &Setpoint) -> Result<bool> {
        let record = setpoint.clone();
        self.execute(move |conn| {
            let inserted = conn
                .execute(
                    "INSERT OR IGNORE INTO setpoints (id, target_temperature, target_humidity, updated_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        SETPOINT_KEY,
                        record.target_temperature,
                        record.target_humidity,
                        format_timestamp(&record.updated_at),
                    ],
                )
                .with_context(|| "failed to seed setpoint")?;
            Ok(inserted > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_setpoint_is_none() {
        let db = Database::in_memory().unwrap();
        assert!(db.get_setpoint().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_without_record_fails_and_creates_nothing() {
        let db = Database::in_memory().unwrap();
        let err = db
            .update_setpoint_field(SetpointField::Temperature, 25.5)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not been initialized"));
        assert!(db.get_setpoint().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seed_only_writes_once() {
        let db = Database::in_memory().unwrap();
        assert!(db
            .insert_setpoint_if_absent(&Setpoint::new(24.0, 50.0))
            .await
            .unwrap());
        assert!(!db
            .insert_setpoint_if_absent(&Setpoint::new(30.0, 70.0))
            .await
            .unwrap());

        let stored = db.get_setpoint().await.unwrap().unwrap();
        assert_eq!(stored.target_temperature, 24.0);
        assert_eq!(stored.target_humidity, 50.0);
    }

    #[tokio::test]
    async fn update_touches_only_one_field() {
        let db = Database::in_memory().unwrap();
        db.insert_setpoint_if_absent(&Setpoint::new(24.0, 50.0))
            .await
            .unwrap();
        db.update_setpoint_field(SetpointField::Humidity, 62.5)
            .await
            .unwrap();

        let stored = db.get_setpoint().await.unwrap().unwrap();
        assert_eq!(stored.target_temperature, 24.0);
        assert_eq!(stored.target_humidity, 62.5);
    }
}
