use std::time::Duration;

use dht_dashboard_lib::{
    config::GeneratorConfig,
    db::Database,
    generator::{GeneratorController, ReadingSynth},
};

#[tokio::test]
async fn generator_fills_the_database_until_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("generated.sqlite3")).unwrap();
    let config = GeneratorConfig {
        period_ms: 100,
        ..GeneratorConfig::default()
    };

    let mut controller = GeneratorController::new();
    controller
        .start(db.clone(), ReadingSynth::seeded(&config, 5), config.period())
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1_050)).await;
    let stats = controller.stop().await.unwrap();

    let stored = db.count_readings().await.unwrap();
    assert_eq!(stats.inserted, stored);
    assert_eq!(stats.failed, 0);
    assert!((9..=12).contains(&stored), "stored {stored}");

    for reading in db.get_latest_readings(100).await.unwrap() {
        assert!(config.temperature.contains(reading.temperature));
        assert!(config.humidity.contains(reading.humidity));
    }
}
