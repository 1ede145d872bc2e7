//! Command-line configuration for the bootstrap, node and console binaries.
//!
//! Every option can also be supplied through an environment variable.

use clap::Parser;

pub const DEFAULT_BOOTSTRAP_ADDR: &str = "127.0.0.1:9989";
pub const DEFAULT_NODE_ADDR: &str = "127.0.0.1:0";

#[derive(Parser, Debug, Clone)]
#[command(name = "chain-bootstrap")]
#[command(about = "Rendezvous server that assigns each joining node its parent")]
pub struct BootstrapConfig {
    /// Address to listen on
    #[arg(long, env = "CHAIN_BOOTSTRAP_ADDR", default_value = DEFAULT_BOOTSTRAP_ADDR)]
    pub addr: String,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}

impl BootstrapConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            verbose: false,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "chain-node")]
#[command(about = "Chain participant that joins through the bootstrap")]
pub struct NodeConfig {
    /// Address to listen on (port 0 picks a free port)
    #[arg(long, env = "CHAIN_NODE_ADDR", default_value = DEFAULT_NODE_ADDR)]
    pub addr: String,

    /// Address of the bootstrap server
    #[arg(long, env = "CHAIN_BOOTSTRAP_ADDR", default_value = DEFAULT_BOOTSTRAP_ADDR)]
    pub bootstrap_addr: String,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}

impl NodeConfig {
    pub fn new(addr: impl Into<String>, bootstrap_addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            bootstrap_addr: bootstrap_addr.into(),
            verbose: false,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "chain-console")]
#[command(about = "Operator console that launches bootstrap and node processes")]
pub struct ConsoleConfig {
    /// Path to the bootstrap executable
    #[arg(long, env = "CHAIN_BOOTSTRAP_PATH", default_value = "chain-bootstrap")]
    pub bootstrap_path: String,

    /// Path to the node executable
    #[arg(long, env = "CHAIN_NODE_PATH", default_value = "chain-node")]
    pub node_path: String,

    /// Address the bootstrap listens on and nodes join through
    #[arg(long, env = "CHAIN_BOOTSTRAP_ADDR", default_value = DEFAULT_BOOTSTRAP_ADDR)]
    pub bootstrap_addr: String,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}
