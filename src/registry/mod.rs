//! Contract Registry Module
//!
//! Maps contract identifiers to the contract that validates transactions
//! referencing them.

mod contracts;
pub use contracts::{ContractRegistry, RegistryError};
