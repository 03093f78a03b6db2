//! Node connector with ordered failover and cooperative cancellation
//!
//! Opens a management session to one node, or to the first reachable
//! node among a candidate list. Failover is strictly sequential in the
//! order supplied by the caller, so repeated calls with the same
//! candidate order and cluster state are deterministic.

use crate::cluster::{Cluster, Node};
use crate::error::{EndpointFailure, Error};
use crate::session::{NodeSession, SessionFactory};
use crate::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct NodeConnector {
    factory: Arc<dyn SessionFactory>,
    /// Cancellation token for graceful shutdown; a cancelled connect
    /// surfaces as `Error::Interrupted`
    shutdown: CancellationToken,
}

impl NodeConnector {
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            factory,
            shutdown: CancellationToken::new(),
        }
    }

    /// Get a cancellation token that can be used to abort in-flight
    /// connects on shutdown.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Connect to the first reachable endpoint among the candidates,
    /// tried in the order given. If every attempt fails, the error
    /// carries the per-endpoint failure reasons. A shutdown signalled
    /// mid-failover stops the walk at the current candidate and
    /// surfaces as `Error::Interrupted`.
    pub async fn connect_any(
        &self,
        cluster: &Cluster,
        endpoints: &[String],
    ) -> Result<Arc<dyn NodeSession>> {
        let mut attempts = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let node = Node::named(cluster.name.as_str(), endpoint.as_str());
            let attempt = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!(cluster = %cluster.name, endpoint = %endpoint, "failover aborted by shutdown");
                    return Err(Error::Interrupted {
                        endpoint: endpoint.clone(),
                    });
                }
                session = self.factory.connect(&node) => session,
            };
            match attempt {
                Ok(session) => {
                    debug!(cluster = %cluster.name, endpoint = %endpoint, "session established");
                    return Ok(session);
                }
                Err(e) => {
                    debug!(cluster = %cluster.name, endpoint = %endpoint, error = %e, "connect attempt failed");
                    attempts.push(EndpointFailure {
                        endpoint: endpoint.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        warn!(cluster = %cluster.name, candidates = endpoints.len(), "no reachable endpoint");
        Err(Error::Connection {
            cluster: cluster.name.clone(),
            attempts,
        })
    }

    /// Connect to exactly the given node. A shutdown signalled while
    /// the connect is in flight surfaces as `Error::Interrupted`; any
    /// partially established session is dropped, which closes it.
    pub async fn connect_node(&self, node: &Node) -> Result<Arc<dyn NodeSession>> {
        tokio::select! {
            _ = self.shutdown.cancelled() => {
                debug!(node = %node, "connect aborted by shutdown");
                Err(Error::Interrupted {
                    endpoint: node.hostname.clone(),
                })
            }
            session = self.factory.connect(node) => session,
        }
    }
}
