//! State Management Module
//!
//! This module keeps the latest accepted version of every agreement in
//! memory, keyed by linear id, so clients can follow an agreement through
//! its workflow.

mod cache;
pub use cache::{StateCache, StateConflict};
