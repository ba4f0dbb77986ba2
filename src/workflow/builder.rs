use crate::{
    AccordanceState, AccordanceStatus, CommandKind, LedgerTransaction, Party, PublicKey,
    TimeWindow,
};
use std::collections::BTreeSet;

/// Incrementally assembles a `LedgerTransaction`
///
/// The builder performs no validation; run the result through the
/// contract before submitting it.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    inputs: Vec<AccordanceState>,
    outputs: Vec<AccordanceState>,
    commands: Vec<CommandKind>,
    signers: BTreeSet<PublicKey>,
    time_window: Option<TimeWindow>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input_state(mut self, state: AccordanceState) -> Self {
        self.inputs.push(state);
        self
    }

    pub fn add_output_state(mut self, state: AccordanceState) -> Self {
        self.outputs.push(state);
        self
    }

    /// Attach a command together with the keys required to sign it
    pub fn add_command<I>(mut self, kind: CommandKind, signers: I) -> Self
    where
        I: IntoIterator<Item = PublicKey>,
    {
        self.commands.push(kind);
        self.signers.extend(signers);
        self
    }

    pub fn set_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = Some(time_window);
        self
    }

    pub fn build(self) -> LedgerTransaction {
        LedgerTransaction {
            inputs: self.inputs,
            outputs: self.outputs,
            commands: self.commands,
            signers: self.signers,
            time_window: self.time_window,
        }
    }
}

/// Issue a new agreement proposed by `initiating_party`
///
/// Returns the transaction together with the issued state so callers can
/// later complete it.
pub fn issue_agreement(
    initiating_party: Party,
    counter_party: Party,
    time_window: TimeWindow,
) -> (LedgerTransaction, AccordanceState) {
    let signer = initiating_party.owning_key;
    let state = AccordanceState::propose(initiating_party, counter_party);

    let tx = TransactionBuilder::new()
        .add_output_state(state.clone())
        .add_command(CommandKind::Issue, [signer])
        .set_time_window(time_window)
        .build();

    (tx, state)
}

/// Complete `before` with the reviewer's decision, signed by both parties
pub fn complete_agreement(
    before: &AccordanceState,
    status: AccordanceStatus,
    time_window: TimeWindow,
) -> LedgerTransaction {
    let signers = before.participants().map(|party| party.owning_key);

    TransactionBuilder::new()
        .add_input_state(before.clone())
        .add_output_state(before.with_status(status))
        .add_command(CommandKind::Completed, signers)
        .set_time_window(time_window)
        .build()
}
