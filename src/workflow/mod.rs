//! Workflow Module
//!
//! Helpers the submitting application uses to assemble accordance
//! transactions: issuing a new agreement and completing an existing one.

mod builder;

pub use builder::{TransactionBuilder, complete_agreement, issue_agreement};
