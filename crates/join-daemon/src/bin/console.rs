//! chain-console: launches bootstrap and node processes from typed commands.

use anyhow::Result;
use clap::Parser;
use join_daemon::{logging, Console, ConsoleConfig};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConsoleConfig::parse();
    logging::init(config.verbose);

    let mut console = Console::new(config);
    tokio::select! {
        result = console.run(BufReader::new(tokio::io::stdin())) => result?,
        _ = join_daemon::shutdown_signal() => {}
    }
    Ok(())
}
