use super::NetworkHostAndPort;
use crate::{Party, config::NodeConfig};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("Node {0} is unreachable")]
    Unreachable(String),
}

/// Read-only queries against a running ledger node
pub trait NodeService: Send + Sync {
    /// Legal identity the node signs with
    fn identity(&self) -> Result<Party, NodeError>;

    /// Notaries advertised on the network map
    fn notaries(&self) -> Result<Vec<Party>, NodeError>;

    /// Flows the node is able to start
    fn flows(&self) -> Result<Vec<String>, NodeError>;

    /// Addresses the node listens on
    fn addresses(&self) -> Result<Vec<NetworkHostAndPort>, NodeError>;
}

/// Node whose answers come from the service configuration
///
/// A node configured as offline fails every query with
/// `NodeError::Unreachable`.
#[derive(Debug, Clone)]
pub struct ConfiguredNode {
    config: NodeConfig,
}

impl ConfiguredNode {
    pub fn new(config: NodeConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    fn ensure_online(&self) -> Result<(), NodeError> {
        if self.config.online {
            Ok(())
        } else {
            debug!("Node {} is configured offline", self.config.name);
            Err(NodeError::Unreachable(self.config.name.clone()))
        }
    }
}

impl NodeService for ConfiguredNode {
    fn identity(&self) -> Result<Party, NodeError> {
        self.ensure_online()?;
        Ok(self.config.identity.clone())
    }

    fn notaries(&self) -> Result<Vec<Party>, NodeError> {
        self.ensure_online()?;
        Ok(self.config.notaries.clone())
    }

    fn flows(&self) -> Result<Vec<String>, NodeError> {
        self.ensure_online()?;
        Ok(self.config.flows.clone())
    }

    fn addresses(&self) -> Result<Vec<NetworkHostAndPort>, NodeError> {
        self.ensure_online()?;
        Ok(self.config.addresses.clone())
    }
}

/// Node services keyed by node name
#[derive(Clone, Default)]
pub struct NodeServices {
    services: BTreeMap<String, Arc<dyn NodeService>>,
}

impl NodeServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `ConfiguredNode` per configured entry
    pub fn from_config(nodes: &[NodeConfig]) -> Self {
        let mut services = Self::new();
        for node in nodes {
            info!(
                "Registering node service {} ({})",
                node.name, node.identity.name
            );
            services.insert(node.name.clone(), Arc::new(ConfiguredNode::new(node.clone())));
        }
        services
    }

    pub fn insert(&mut self, name: impl Into<String>, service: Arc<dyn NodeService>) {
        self.services.insert(name.into(), service);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn NodeService>> {
        self.services.get(name).cloned()
    }

    /// Node names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
