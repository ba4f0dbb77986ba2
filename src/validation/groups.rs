use crate::{AccordanceState, UniqueIdentifier};
use std::collections::BTreeMap;

/// Inputs and outputs of a transaction that share one `linear_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateGroup<'a> {
    pub linear_id: &'a UniqueIdentifier,
    pub inputs: Vec<&'a AccordanceState>,
    pub outputs: Vec<&'a AccordanceState>,
}

impl StateGroup<'_> {
    /// Exactly one version consumed and one produced
    pub fn is_single_version_transition(&self) -> bool {
        self.inputs.len() == 1 && self.outputs.len() == 1
    }
}

/// Groups states by `linear_id`, ordered by identifier
pub fn group_states<'a>(
    inputs: &'a [AccordanceState],
    outputs: &'a [AccordanceState],
) -> Vec<StateGroup<'a>> {
    let mut groups: BTreeMap<&'a UniqueIdentifier, StateGroup<'a>> = BTreeMap::new();

    for state in inputs {
        groups
            .entry(&state.linear_id)
            .or_insert_with(|| StateGroup {
                linear_id: &state.linear_id,
                inputs: Vec::new(),
                outputs: Vec::new(),
            })
            .inputs
            .push(state);
    }

    for state in outputs {
        groups
            .entry(&state.linear_id)
            .or_insert_with(|| StateGroup {
                linear_id: &state.linear_id,
                inputs: Vec::new(),
                outputs: Vec::new(),
            })
            .outputs
            .push(state);
    }

    groups.into_values().collect()
}
