//! Bootstrap: the rendezvous server new nodes contact first.
//!
//! Keeps the registry of joined nodes and tells each newcomer which node
//! to attach to.

use crate::config::BootstrapConfig;
use crate::error::{HandlerError, StartupError};
use crate::transport::{self, Handler};
use async_trait::async_trait;
use join_core::{NodeIntroduction, NodeIntroductionResponse, Payload, Registry};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{info, info_span, Instrument};

/// Bootstrap request handling, shared by all connection tasks.
#[derive(Debug, Default)]
pub struct BootstrapService {
    registry: Mutex<Registry>,
}

impl BootstrapService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the introduced node and assign it a parent.
    ///
    /// The parent lookup and the append happen under a single lock, so
    /// concurrent introductions always see a consistent total order.
    pub async fn node_introduction(&self, params: NodeIntroduction) -> NodeIntroductionResponse {
        let response = self.registry.lock().await.introduce(params.addr.clone());
        info!(
            "Added node {} to list (parent: {:?}, size: {})",
            params.addr,
            response.parent(),
            response.nodes.len()
        );
        response
    }

    /// Snapshot of the registry in join order.
    pub async fn nodes(&self) -> Vec<String> {
        self.registry.lock().await.nodes().to_vec()
    }
}

#[async_trait]
impl Handler for BootstrapService {
    async fn handle(&self, payload: Payload) -> Result<Payload, HandlerError> {
        match payload {
            Payload::Introduction(params) => Ok(self.node_introduction(params).await.into()),
            other => Err(HandlerError::UnhandledMethod(other.method())),
        }
    }
}

/// A bound bootstrap, ready to serve.
pub struct Bootstrap {
    listener: TcpListener,
    local_addr: SocketAddr,
    service: Arc<BootstrapService>,
}

impl Bootstrap {
    pub async fn bind(addr: &str) -> Result<Self, StartupError> {
        let bind_err = |source| StartupError::Bind {
            addr: addr.to_string(),
            source,
        };
        let listener = transport::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        Ok(Self {
            listener,
            local_addr,
            service: Arc::new(BootstrapService::new()),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn service(&self) -> Arc<BootstrapService> {
        Arc::clone(&self.service)
    }

    /// Serve introductions until `shutdown` resolves.
    pub async fn serve(self, shutdown: impl Future<Output = ()>) {
        info!("Bootstrap server running on {}", self.local_addr);
        transport::serve(self.listener, self.service, shutdown).await;
    }
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn run_bootstrap(
    config: &BootstrapConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<(), StartupError> {
    let bootstrap = Bootstrap::bind(&config.addr).await?;
    let span = info_span!("bootstrap", addr = %bootstrap.local_addr());
    bootstrap.serve(shutdown).instrument(span).await;
    Ok(())
}
