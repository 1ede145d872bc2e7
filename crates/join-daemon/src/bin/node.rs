//! chain-node: joins the chain through the bootstrap, then serves introductions.

use anyhow::Result;
use clap::Parser;
use join_daemon::{logging, run_node, shutdown_signal, NodeConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::parse();
    logging::init(config.verbose);

    info!(
        "Starting node on {} (bootstrap: {})",
        config.addr, config.bootstrap_addr
    );
    run_node(&config, shutdown_signal()).await?;
    Ok(())
}
