use crate::{AccordanceState, LedgerTransaction, UniqueIdentifier};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Reasons an accepted transaction cannot be applied to the cached view
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateConflict {
    #[error("Agreement {0} has no recorded version to consume")]
    UnknownInput(UniqueIdentifier),

    #[error("Input for agreement {0} is not its latest recorded version")]
    StaleInput(UniqueIdentifier),

    #[error("Agreement {0} has already been issued")]
    AlreadyIssued(UniqueIdentifier),
}

impl StateConflict {
    /// Stable name of the conflict
    pub fn rule(&self) -> &'static str {
        match self {
            StateConflict::UnknownInput(_) => "UnknownInput",
            StateConflict::StaleInput(_) => "StaleInput",
            StateConflict::AlreadyIssued(_) => "AlreadyIssued",
        }
    }
}

/// Latest known version of each agreement
///
/// Only transactions that passed validation are recorded here.
#[derive(Clone, Default)]
pub struct StateCache {
    states: Arc<RwLock<HashMap<Uuid, AccordanceState>>>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, linear_id: &Uuid) -> Option<AccordanceState> {
        let states = self.states.read().await;
        states.get(linear_id).cloned()
    }

    /// Record an accepted transaction: consumed versions are dropped and
    /// produced versions become the latest.
    ///
    /// Every input must be the latest recorded version of its agreement and
    /// every output of an agreement not consumed here must be new to the
    /// cache. Nothing is written when either check fails.
    pub async fn record(&self, tx: &LedgerTransaction) -> Result<(), StateConflict> {
        let mut states = self.states.write().await;

        for input in &tx.inputs {
            match states.get(&input.linear_id.id) {
                None => return Err(StateConflict::UnknownInput(input.linear_id.clone())),
                Some(latest) if latest != input => {
                    return Err(StateConflict::StaleInput(input.linear_id.clone()));
                }
                Some(_) => {}
            }
        }
        for output in &tx.outputs {
            let consumed = tx.inputs.iter().any(|i| i.linear_id == output.linear_id);
            if !consumed && states.contains_key(&output.linear_id.id) {
                return Err(StateConflict::AlreadyIssued(output.linear_id.clone()));
            }
        }

        for input in &tx.inputs {
            states.remove(&input.linear_id.id);
        }
        for output in &tx.outputs {
            states.insert(output.linear_id.id, output.clone());
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}
