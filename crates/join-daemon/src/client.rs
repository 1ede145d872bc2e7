//! Outbound half of the join sequence.

use crate::error::JoinError;
use crate::transport;
use join_core::{NodeIntroduction, NodeIntroductionResponse, OkResponse};
use tracing::debug;

/// Talks to the bootstrap or to a peer node on behalf of a joining node.
#[derive(Debug, Clone)]
pub struct JoinClient {
    addr: String,
}

impl JoinClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Introduce ourselves to the bootstrap and receive our parent assignment.
    pub async fn introduce_to_bootstrap(
        &self,
        message: &NodeIntroduction,
    ) -> Result<NodeIntroductionResponse, JoinError> {
        debug!("Introducing {} to bootstrap {}", message.addr, self.addr);
        transport::request(&self.addr, message.clone())
            .await
            .map_err(|source| JoinError::Bootstrap {
                addr: self.addr.clone(),
                source,
            })
    }

    /// Introduce ourselves to our assigned parent.
    ///
    /// Fails if the parent cannot be reached or answers `ok: false`.
    pub async fn introduce_to_node(&self, message: &NodeIntroduction) -> Result<(), JoinError> {
        debug!("Introducing {} to node {}", message.addr, self.addr);
        let response: OkResponse = transport::request(&self.addr, message.clone())
            .await
            .map_err(|source| JoinError::Parent {
                addr: self.addr.clone(),
                source,
            })?;

        if !response.ok {
            return Err(JoinError::Rejected {
                addr: self.addr.clone(),
            });
        }
        Ok(())
    }
}
