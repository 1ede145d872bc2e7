//! Node: a chain participant.
//!
//! On startup a node asks the bootstrap for its parent, attaches to that
//! parent, and only then starts accepting introductions from later joiners.

use crate::client::JoinClient;
use crate::config::NodeConfig;
use crate::error::{HandlerError, JoinError, StartupError};
use crate::transport::{self, Handler};
use async_trait::async_trait;
use join_core::{NodeIntroduction, OkResponse, Payload};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::Mutex;
use tracing::{error, info, info_span, Instrument};

/// Per-node state shared by all connection tasks.
#[derive(Debug)]
pub struct NodeService {
    /// Address we advertise to the bootstrap and to peers
    addr: String,
    /// Parent first (if any), then every node that attached to us
    neighbors: Mutex<Vec<String>>,
}

impl NodeService {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            neighbors: Mutex::new(Vec::new()),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Snapshot of the neighbor list.
    pub async fn neighbors(&self) -> Vec<String> {
        self.neighbors.lock().await.clone()
    }

    /// Record a later joiner that attached to us.
    pub async fn node_introduction(&self, params: NodeIntroduction) -> OkResponse {
        info!("Node {} introduced", params.addr);
        self.neighbors.lock().await.push(params.addr);
        OkResponse::accepted()
    }

    /// Join the network through the bootstrap at `bootstrap_addr`.
    ///
    /// Asks the bootstrap for a parent, then introduces ourselves to that
    /// parent. The first node in the network has no parent and is done
    /// after the bootstrap step. Nothing is retried.
    pub async fn join_network(&self, bootstrap_addr: &str) -> Result<(), JoinError> {
        let message = NodeIntroduction::new(self.addr.clone());

        let response = JoinClient::new(bootstrap_addr)
            .introduce_to_bootstrap(&message)
            .await?;
        info!(
            "Introduced to bootstrap: parent={:?} first={}",
            response.addr, response.first
        );

        let Some(parent) = response.parent() else {
            info!("First node in the network");
            return Ok(());
        };

        self.neighbors.lock().await.push(parent.to_string());

        JoinClient::new(parent).introduce_to_node(&message).await?;
        info!("Introduced to node {}", parent);
        Ok(())
    }
}

#[async_trait]
impl Handler for NodeService {
    async fn handle(&self, payload: Payload) -> Result<Payload, HandlerError> {
        match payload {
            Payload::Introduction(params) => Ok(self.node_introduction(params).await.into()),
            other => Err(HandlerError::UnhandledMethod(other.method())),
        }
    }
}

/// A node whose address is reserved but which accepts no connections yet.
///
/// Binding up front makes the advertised address concrete even for port 0.
/// The socket only starts listening once [`Node::join`] succeeds, so peers
/// are refused until then. Dropping a `Node` releases the address.
#[derive(Debug)]
pub struct Node {
    socket: TcpSocket,
    local_addr: SocketAddr,
    service: Arc<NodeService>,
}

impl Node {
    pub async fn bind(addr: &str) -> Result<Self, StartupError> {
        let bind_err = |source| StartupError::Bind {
            addr: addr.to_string(),
            source,
        };
        let socket = transport::bind_socket(addr).await.map_err(bind_err)?;
        let local_addr = socket.local_addr().map_err(bind_err)?;

        Ok(Self {
            socket,
            local_addr,
            service: Arc::new(NodeService::new(local_addr.to_string())),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn service(&self) -> Arc<NodeService> {
        Arc::clone(&self.service)
    }

    /// Run the join sequence, then start listening.
    ///
    /// On failure the socket is closed without ever having listened.
    pub async fn join(self, bootstrap_addr: &str) -> Result<JoinedNode, StartupError> {
        self.service.join_network(bootstrap_addr).await?;

        let listener = transport::listen(self.socket).map_err(|source| StartupError::Listen {
            addr: self.local_addr.to_string(),
            source,
        })?;
        Ok(JoinedNode {
            listener,
            service: self.service,
        })
    }
}

/// A node that completed its join and is listening for later joiners.
#[derive(Debug)]
pub struct JoinedNode {
    listener: TcpListener,
    service: Arc<NodeService>,
}

impl JoinedNode {
    pub fn service(&self) -> Arc<NodeService> {
        Arc::clone(&self.service)
    }

    /// Accept introductions until `shutdown` resolves.
    pub async fn serve(self, shutdown: impl Future<Output = ()>) {
        transport::serve(self.listener, self.service, shutdown).await;
    }
}

/// Bind, join through the configured bootstrap, then serve until `shutdown`.
///
/// A failed join is a startup error: the node never listens.
pub async fn run_node(
    config: &NodeConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<(), StartupError> {
    let node = Node::bind(&config.addr).await?;
    let span = info_span!("node", addr = %node.local_addr());

    async move {
        info!("Running node, sending introduction");
        let node = node
            .join(&config.bootstrap_addr)
            .await
            .inspect_err(|e| error!("Failed to join network: {}", e))?;
        node.serve(shutdown).await;
        Ok::<_, StartupError>(())
    }
    .instrument(span)
    .await
}
