use super::failure::{PartyRole, ValidationFailure};
use super::groups::group_states;
use crate::{AccordanceState, AccordanceStatus, CommandKind, LedgerTransaction, Party};
use tracing::{debug, warn};

/// Registry identifier of the accordance contract
pub const CONTRACT_ID: &str =
    "com.github.manosbatsis.corbeans.corda.workflows.accordance.simple.AccordanceContract";

/// A set of rules a transaction must satisfy to be admitted
///
/// Implementations must be pure: the same transaction always yields the
/// same verdict, whichever node evaluates it.
pub trait Contract: Send + Sync {
    /// Identifier under which the contract is registered
    fn id(&self) -> &str;

    fn verify(&self, tx: &LedgerTransaction) -> Result<(), ValidationFailure>;
}

/// Simple two-party workflow: one party issues a NEW agreement, the other
/// reviews it and completes it as APPROVED or REJECTED.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccordanceContract;

impl Contract for AccordanceContract {
    fn id(&self) -> &str {
        CONTRACT_ID
    }

    fn verify(&self, tx: &LedgerTransaction) -> Result<(), ValidationFailure> {
        validate(tx)
    }
}

/// Validate a transaction against the accordance rules
/// Returns Ok(()) if valid, Err(ValidationFailure) naming the first rule broken
pub fn validate(tx: &LedgerTransaction) -> Result<(), ValidationFailure> {
    debug!(
        "Validating transaction with {} inputs, {} outputs",
        tx.inputs.len(),
        tx.outputs.len()
    );

    // 1. Exactly one command
    let command = single_command(tx)?;

    // 2. Time window, whatever the command
    if tx.time_window.is_none() {
        warn!("Rejecting {} transaction without a time-window", command);
        return Err(ValidationFailure::MissingTimeWindow);
    }

    // 3. Command specific rules
    let verdict = match command {
        CommandKind::Issue => verify_issue(tx),
        CommandKind::Completed => verify_completed(tx),
        CommandKind::Other(name) => Err(ValidationFailure::UnrecognizedCommand {
            command: name.clone(),
        }),
    };

    match &verdict {
        Ok(()) => debug!("{} transaction validation successful", command),
        Err(failure) => warn!("{} transaction rejected: {}", command, failure),
    }
    verdict
}

fn single_command(tx: &LedgerTransaction) -> Result<&CommandKind, ValidationFailure> {
    match tx.commands.as_slice() {
        [command] => Ok(command),
        commands => {
            warn!("Expected a single command, found {}", commands.len());
            Err(ValidationFailure::CommandCount {
                found: commands.len(),
            })
        }
    }
}

fn verify_issue(tx: &LedgerTransaction) -> Result<(), ValidationFailure> {
    let issued = match (tx.inputs.as_slice(), tx.outputs.as_slice()) {
        ([], [issued]) => issued,
        (inputs, outputs) => {
            return Err(ValidationFailure::MalformedIssue {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
    };

    require_signer(tx, "Issue", PartyRole::InitiatingParty, &issued.initiating_party)?;

    if issued.status != AccordanceStatus::New {
        return Err(ValidationFailure::InvalidInitialStatus {
            status: issued.status,
        });
    }

    Ok(())
}

fn verify_completed(tx: &LedgerTransaction) -> Result<(), ValidationFailure> {
    let groups = group_states(&tx.inputs, &tx.outputs);
    let group = match groups.as_slice() {
        [group] => group,
        groups => {
            return Err(ValidationFailure::MultipleAgreements {
                groups: groups.len(),
            });
        }
    };

    // Batched transitions of one agreement are not supported
    if !group.is_single_version_transition() {
        return Err(ValidationFailure::NotSingleVersionTransition {
            linear_id: group.linear_id.clone(),
            inputs: group.inputs.len(),
            outputs: group.outputs.len(),
        });
    }
    let before = group.inputs[0];
    let after = group.outputs[0];

    if before.status != AccordanceStatus::New {
        return Err(ValidationFailure::AlreadyFinal {
            status: before.status,
        });
    }

    if !after.status.is_final() {
        return Err(ValidationFailure::InvalidFinalStatus {
            status: after.status,
        });
    }

    if let Some(field) = changed_field(before, after) {
        return Err(ValidationFailure::IllegalFieldChange { field });
    }

    require_signer(tx, "Completed", PartyRole::InitiatingParty, &before.initiating_party)?;
    require_signer(tx, "Completed", PartyRole::CounterParty, &before.counter_party)?;

    Ok(())
}

/// First field other than `status` that differs between two versions
///
/// Both versions come from one `linear_id` group, so the identifier always
/// matches; a differing `external_id` label is not a change.
fn changed_field(before: &AccordanceState, after: &AccordanceState) -> Option<&'static str> {
    if before.initiating_party != after.initiating_party {
        Some("initiating_party")
    } else if before.counter_party != after.counter_party {
        Some("counter_party")
    } else {
        None
    }
}

fn require_signer(
    tx: &LedgerTransaction,
    command: &'static str,
    role: PartyRole,
    party: &Party,
) -> Result<(), ValidationFailure> {
    if tx.signers.contains(&party.owning_key) {
        return Ok(());
    }
    Err(ValidationFailure::MissingSignature {
        command,
        role,
        party: party.name.clone(),
    })
}
