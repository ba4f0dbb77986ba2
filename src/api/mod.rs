//! API Module
//!
//! This module handles the HTTP API: node queries for every configured node
//! and the endpoint clients use to submit transactions.

mod server;

#[cfg(test)]
mod tests;

pub use server::{ApiError, AppState, ErrorBody, Server, SubmitTransaction, router};
