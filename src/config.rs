//! Configuration Module
//!
//! This module defines all configuration structures for the service.
//! Configuration is loaded from TOML files and parsed using serde.

use crate::{Party, node::NetworkHostAndPort};
use serde::Deserialize;
use std::fs;

/// Main configuration structure
///
/// Contains all configuration sections for the service.
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [api]
/// host = "127.0.0.1"
/// port = 8080
///
/// [[nodes]]
/// name = "partyA"
/// identity = { name = "O=PartyA,L=London,C=GB", owning_key = "8a88e3dd..." }
/// flows = ["IssueAccordanceFlow"]
/// addresses = ["localhost:10005"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on (e.g., 8080)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// One ledger node exposed through the node query endpoints
///
/// Keys and addresses are validated while the file is parsed, so a loaded
/// configuration never carries a malformed identity.
///
/// # Fields
/// - `name`: Service name used in URLs (e.g., "partyA")
/// - `identity`: Legal identity of the node
/// - `notaries`: Notaries the node knows about
/// - `flows`: Flows the node can start
/// - `addresses`: `host:port` addresses the node listens on
/// - `online`: Set to false to simulate an unreachable node
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub name: String,
    pub identity: Party,
    #[serde(default)]
    pub notaries: Vec<Party>,
    #[serde(default)]
    pub flows: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<NetworkHostAndPort>,
    #[serde(default = "default_online")]
    pub online: bool,
}

fn default_online() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read, the TOML is invalid, or two
    ///   nodes share a name
    pub fn load(path: &str) -> anyhow::Result<Self> {
        // Read the file contents as a string
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;

        let mut seen = std::collections::HashSet::new();
        for node in &config.nodes {
            if !seen.insert(node.name.as_str()) {
                anyhow::bail!("Duplicate node name in config: {}", node.name);
            }
        }

        Ok(config)
    }
}
