//! Basic usage example - register an asset, offline-first

use patrimonio_core::{
    AssetCondition, AssetRecord, Coordinator, PatrimonioApi, Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Get data dir from args or use a local default
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./patrimonio-data".to_string());

    println!("Initializing PatrimonioApi with data dir: {}", path);
    let api = PatrimonioApi::builder(&path).initially_online(false).build()?;

    if let Ok(url) = std::env::var("PATRIMONIO_REGISTRY_URL") {
        api.set_endpoint(&url)?;
    }
    println!("Endpoint configured: {}", api.is_configured());

    let mut record = AssetRecord::new(
        "Unidade Centro",
        "001234",
        "Cadeira Giratória",
        AssetCondition::LikeNew,
    );
    record.brand = "Flexform".into();
    record
        .coordinators
        .push(Coordinator::new("123456", "Maria Souza").with_role("Coordenadora"));

    // With connectivity off, this lands in the durable queue.
    let outcome = api.submit(record).await?;
    println!("{}", outcome);
    println!("Pending submissions: {}", api.pending_count());

    // Simulate a reconnect event and flush the queue.
    api.connectivity().set_online(true);
    if api.is_configured() {
        let report = api.sync_pending().await?;
        println!("Synced {}, still pending {}", report.synced, report.failed);
    } else {
        println!("Set PATRIMONIO_REGISTRY_URL to sync against a real registry.");
    }

    Ok(())
}
