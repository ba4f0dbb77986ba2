//! This crate implements the accordance workflow: a two-party agreement that
//! one party issues and the other approves or rejects. It includes the
//! contract that validates workflow transactions, helpers for building them,
//! and an HTTP service exposing node queries and transaction submission.

pub mod types; // Agreement state, parties, keys, time windows and transactions.
pub mod validation; // The accordance contract and its failure taxonomy.
pub mod workflow; // Builders for Issue and Completed transactions.
pub mod registry; // Lookup of contracts by identifier.
pub mod node; // Read-only queries against ledger nodes.
pub mod state; // Latest accepted version of each agreement.
pub mod api; // HTTP endpoints.
pub mod config; // Defines and loads service configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use validation::{AccordanceContract, CONTRACT_ID, ValidationFailure, validate};
