use chrono::{DateTime, Duration, TimeZone, Utc};
use dht_dashboard_lib::{
    chart::TerminalCharts,
    config::AppConfig,
    db::{Database, Reading},
    poll::{refresh, Dashboard, RefreshOutcome},
};

fn at(second: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap() + Duration::seconds(second)
}

async fn seeded_db(dir: &tempfile::TempDir, count: i64) -> Database {
    let db = Database::new(dir.path().join("readings.sqlite3")).unwrap();
    for second in 1..=count {
        let reading = Reading::new(at(second), 24.0 + second as f64 / 10.0, 45.0);
        db.insert_reading(&reading).await.unwrap();
    }
    db
}

#[tokio::test]
async fn refresh_returns_the_most_recent_rows_oldest_first() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(&dir, 10).await;

    let window = refresh(&db, 5).await.unwrap();

    let expected: Vec<_> = (6..=10).map(at).collect();
    assert_eq!(window.timestamps, expected);
    assert_eq!(window.temperatures, vec![24.6, 24.7, 24.8, 24.9, 25.0]);
    assert_eq!(window.humidities, vec![45.0; 5]);
}

#[tokio::test]
async fn refresh_never_exceeds_the_row_count() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(&dir, 3).await;

    let window = refresh(&db, 10).await.unwrap();
    assert_eq!(window.len(), 3);
    assert!(window.timestamps.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn empty_table_is_an_empty_window() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(&dir, 0).await;

    let window = refresh(&db, 10).await.unwrap();
    assert!(window.is_empty());
    assert!(window.temperatures.is_empty());
}

#[tokio::test]
async fn refresh_without_writes_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(&dir, 8).await;

    let first = refresh(&db, 5).await.unwrap();
    let second = refresh(&db, 5).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn second_handle_sees_rows_written_by_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite3");
    let writer = Database::new(path.clone()).unwrap();
    let reader = Database::new(path).unwrap();

    writer
        .insert_reading(&Reading::new(at(1), 26.1, 52.3))
        .await
        .unwrap();

    let window = refresh(&reader, 10).await.unwrap();
    assert_eq!(window.temperatures, vec![26.1]);
    assert_eq!(window.humidities, vec![52.3]);
}

#[tokio::test]
async fn dashboard_draws_each_panel_with_its_own_window() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db(&dir, 10).await;
    let mut dashboard = Dashboard::new(db, TerminalCharts::new(), AppConfig::default().panels);

    assert_eq!(
        dashboard.enter(0).await,
        Some(RefreshOutcome::Redrawn { points: 10 })
    );
    assert_eq!(
        dashboard.enter(1).await,
        Some(RefreshOutcome::Redrawn { points: 5 })
    );

    let compact = dashboard.charts().frame("compact").unwrap();
    assert_eq!(compact.series.len(), 2);
    assert_eq!(compact.series[0].points.first().map(|p| p.0), Some(at(6)));
    assert_eq!(compact.series[0].labels[0].text, "24.6℃");
    assert_eq!(dashboard.charts().redraws(), 2);
}
