#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dht_dashboard_lib::run_generator().await
}
