//! City Data Trust Pipeline - Main Entry Point

use api::{init_logging, run_server, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== City Data Trust Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Starting disaster monitoring and dataset exchange...");

    let config = ServerConfig::from_env();
    run_server(config).await?;

    Ok(())
}
