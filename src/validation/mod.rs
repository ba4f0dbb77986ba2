//! Transaction Validation Module
//!
//! This module holds the accordance contract: the rules a transaction must
//! satisfy before the ledger admits it. Validation is pure and deterministic,
//! so every node re-verifying a transaction reaches the same verdict.

mod contract;
mod failure;
mod groups;


pub use contract::{AccordanceContract, Contract, CONTRACT_ID, validate};
pub use failure::{PartyRole, ValidationFailure};
pub use groups::{StateGroup, group_states};
