//! join-daemon: TCP bootstrap and node services for the chain join protocol.
//!
//! The binaries are thin wrappers around this library, which also lets the
//! integration tests drive real services over loopback.

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod node;
pub mod transport;

pub use bootstrap::{run_bootstrap, Bootstrap, BootstrapService};
pub use client::JoinClient;
pub use config::{BootstrapConfig, ConsoleConfig, NodeConfig};
pub use console::Console;
pub use error::{HandlerError, JoinError, ServeError, StartupError, TransportError};
pub use node::{run_node, JoinedNode, Node, NodeService};
pub use transport::{Handler, MAX_MESSAGE_SIZE};

/// Resolves on Ctrl+C.
///
/// If the signal handler cannot be installed, never resolves.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
