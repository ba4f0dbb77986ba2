use crate::{
    LedgerTransaction,
    validation::{AccordanceContract, Contract, ValidationFailure},
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("No contract registered under {0}")]
    UnknownContract(String),

    #[error(transparent)]
    Rejected(#[from] ValidationFailure),
}

/// Contract registry
///
/// Looks up the contract named by a transaction and runs it. Contracts are
/// immutable once registered, so the registry can be shared freely.
#[derive(Clone, Default)]
pub struct ContractRegistry {
    contracts: HashMap<String, Arc<dyn Contract>>,
}

impl ContractRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the contracts this crate ships
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AccordanceContract));
        registry
    }

    /// Register a contract under its own identifier, replacing any previous one
    pub fn register(&mut self, contract: Arc<dyn Contract>) {
        debug!("Registering contract {}", contract.id());
        self.contracts.insert(contract.id().to_string(), contract);
    }

    pub fn get(&self, contract_id: &str) -> Option<Arc<dyn Contract>> {
        self.contracts.get(contract_id).cloned()
    }

    pub fn contract_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.contracts.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Verify `tx` with the contract registered under `contract_id`
    ///
    /// # Returns
    /// * `Ok(())` if the contract accepts the transaction
    /// * `Err(RegistryError::UnknownContract)` if nothing is registered under the id
    /// * `Err(RegistryError::Rejected)` with the contract's reason otherwise
    pub fn verify(&self, contract_id: &str, tx: &LedgerTransaction) -> Result<(), RegistryError> {
        let contract = self.get(contract_id).ok_or_else(|| {
            warn!("Verification requested for unknown contract {}", contract_id);
            RegistryError::UnknownContract(contract_id.to_string())
        })?;

        contract.verify(tx)?;
        Ok(())
    }
}
