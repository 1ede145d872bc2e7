//! chain-bootstrap: rendezvous server for the chain join protocol.

use anyhow::Result;
use clap::Parser;
use join_daemon::{logging, run_bootstrap, shutdown_signal, BootstrapConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = BootstrapConfig::parse();
    logging::init(config.verbose);

    info!("Starting bootstrap on {}", config.addr);
    run_bootstrap(&config, shutdown_signal()).await?;
    Ok(())
}
