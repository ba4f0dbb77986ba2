use crate::{AccordanceStatus, UniqueIdentifier};
use std::fmt;
use thiserror::Error;

/// Which side of the agreement a rule refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    InitiatingParty,
    CounterParty,
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyRole::InitiatingParty => write!(f, "initiating party"),
            PartyRole::CounterParty => write!(f, "counterparty"),
        }
    }
}

/// Reasons a transaction is rejected by the accordance contract
///
/// Every variant is terminal for the transaction. The display string is the
/// reason reported back to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Transaction must carry exactly one command, found {found}")]
    CommandCount { found: usize },

    #[error("Transaction must have a time-window")]
    MissingTimeWindow,

    #[error(
        "Issue of a new agreement must not include any inputs and must produce exactly one output (found {inputs} inputs, {outputs} outputs)"
    )]
    MalformedIssue { inputs: usize, outputs: usize },

    #[error("Initial Issue status must be NEW, found {status}")]
    InvalidInitialStatus { status: AccordanceStatus },

    #[error("Completed transaction must touch exactly one agreement, found {groups}")]
    MultipleAgreements { groups: usize },

    #[error(
        "Completed transaction must consume one version and produce one version of agreement {linear_id} (found {inputs} inputs, {outputs} outputs)"
    )]
    NotSingleVersionTransition {
        linear_id: UniqueIdentifier,
        inputs: usize,
        outputs: usize,
    },

    #[error("Only a non-final agreement can be modified, input status is {status}")]
    AlreadyFinal { status: AccordanceStatus },

    #[error("Output must be a final status (APPROVED or REJECTED), found {status}")]
    InvalidFinalStatus { status: AccordanceStatus },

    #[error("Completed command can only change status, {field} was modified")]
    IllegalFieldChange { field: &'static str },

    #[error("{command} command requires the {role} {party} as signer")]
    MissingSignature {
        command: &'static str,
        role: PartyRole,
        party: String,
    },

    #[error("Unrecognised command {command}")]
    UnrecognizedCommand { command: String },
}

impl ValidationFailure {
    /// Stable name of the rule that failed
    pub fn rule(&self) -> &'static str {
        match self {
            ValidationFailure::CommandCount { .. } => "CommandCount",
            ValidationFailure::MissingTimeWindow => "MissingTimeWindow",
            ValidationFailure::MalformedIssue { .. } => "MalformedIssue",
            ValidationFailure::InvalidInitialStatus { .. } => "InvalidInitialStatus",
            ValidationFailure::MultipleAgreements { .. } => "MultipleAgreements",
            ValidationFailure::NotSingleVersionTransition { .. } => "NotSingleVersionTransition",
            ValidationFailure::AlreadyFinal { .. } => "AlreadyFinal",
            ValidationFailure::InvalidFinalStatus { .. } => "InvalidFinalStatus",
            ValidationFailure::IllegalFieldChange { .. } => "IllegalFieldChange",
            ValidationFailure::MissingSignature { .. } => "MissingSignature",
            ValidationFailure::UnrecognizedCommand { .. } => "UnrecognizedCommand",
        }
    }
}
