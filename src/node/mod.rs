//! Node Query Module
//!
//! Read-only view of the ledger nodes this service fronts: each node's
//! identity, the notaries it knows, the flows it can start and the network
//! addresses it listens on.

mod address;
mod service;

#[cfg(test)]
mod tests;

pub use address::NetworkHostAndPort;
pub use service::{ConfiguredNode, NodeError, NodeService, NodeServices};
