use dht_dashboard_lib::{
    db::{Database, Setpoint, SetpointField},
    setpoint::SetpointAccessor,
};

fn open(dir: &tempfile::TempDir) -> Database {
    Database::new(dir.path().join("setpoint.sqlite3")).unwrap()
}

#[tokio::test]
async fn load_before_initialization_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let setpoints = SetpointAccessor::new(open(&dir));
    assert!(setpoints.load().await.unwrap().is_none());
}

#[tokio::test]
async fn saving_temperature_leaves_humidity_alone() {
    let dir = tempfile::tempdir().unwrap();
    let setpoints = SetpointAccessor::new(open(&dir));
    setpoints
        .initialize(Setpoint::new(24.0, 55.0))
        .await
        .unwrap();

    let field: SetpointField = "temperature".parse().unwrap();
    setpoints.save(field, 25.5).await.unwrap();

    let loaded = setpoints.load().await.unwrap().unwrap();
    assert_eq!(loaded.target_temperature, 25.5);
    assert_eq!(loaded.target_humidity, 55.0);
}

#[tokio::test]
async fn save_on_a_missing_record_fails_and_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let setpoints = SetpointAccessor::new(open(&dir));

    let err = setpoints
        .save(SetpointField::Humidity, 60.0)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not been initialized"));
    assert!(setpoints.load().await.unwrap().is_none());
}

#[tokio::test]
async fn saved_values_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    {
        let setpoints = SetpointAccessor::new(open(&dir));
        setpoints
            .initialize(Setpoint::new(24.0, 55.0))
            .await
            .unwrap();
        setpoints
            .save_input(SetpointField::Humidity, "61.5")
            .await
            .unwrap();
    }

    let setpoints = SetpointAccessor::new(open(&dir));
    let loaded = setpoints.load().await.unwrap().unwrap();
    assert_eq!(loaded.target_humidity, 61.5);
    assert!(!setpoints
        .initialize(Setpoint::new(0.0, 0.0))
        .await
        .unwrap());
}

#[tokio::test]
async fn non_numeric_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let setpoints = SetpointAccessor::new(open(&dir));
    setpoints
        .initialize(Setpoint::new(24.0, 55.0))
        .await
        .unwrap();

    assert!(setpoints
        .save_input(SetpointField::Temperature, "hot")
        .await
        .is_err());
    let loaded = setpoints.load().await.unwrap().unwrap();
    assert_eq!(loaded.target_temperature, 24.0);
}
