//! API Server Module
//!
//! This module implements the HTTP server in front of the ledger nodes.
//! It exposes read-only node queries and a submission endpoint that runs
//! candidate transactions through the contract registry before recording
//! them.

use crate::{
    config::ApiConfig,
    node::{NetworkHostAndPort, NodeError, NodeService, NodeServices},
    registry::{ContractRegistry, RegistryError},
    state::StateCache,
    AccordanceState, LedgerTransaction, Party, SubmissionReceipt, SubmissionStatus,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Shared application state that is accessible across all request handlers
///
/// - `registry`: Contracts used to validate submitted transactions
/// - `nodes`: Node services keyed by name
/// - `state_cache`: Latest accepted version of each agreement
#[derive(Clone)]
pub struct AppState {
    registry: Arc<ContractRegistry>,
    nodes: Arc<NodeServices>,
    state_cache: StateCache,
}

impl AppState {
    pub fn new(registry: ContractRegistry, nodes: NodeServices, state_cache: StateCache) -> Self {
        Self {
            registry: Arc::new(registry),
            nodes: Arc::new(nodes),
            state_cache,
        }
    }
}

/// The main API server struct
pub struct Server {
    config: ApiConfig,
    state: AppState,
}

impl Server {
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// # Returns
    /// `Ok(())` when the server shuts down, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        let app = router(self.state);

        let addr = format!("{}:{}", self.config.host, self.config.port);
        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the router with every endpoint wired to `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/nodes", get(list_nodes))
        .route("/api/nodes/:node/whoami", get(node_identity))
        .route("/api/nodes/:node/notaries", get(node_notaries))
        .route("/api/nodes/:node/flows", get(node_flows))
        .route("/api/nodes/:node/addresses", get(node_addresses))
        .route("/api/transactions", post(submit_transaction))
        .route("/api/states/:linear_id", get(get_state))
        .with_state(state)
}

/// Errors surfaced to HTTP clients as `{ "error": message }`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("No contract registered under {0}")]
    UnknownContract(String),

    #[error("No agreement with linear id {0}")]
    UnknownState(Uuid),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownNode(_) | ApiError::UnknownContract(_) | ApiError::UnknownState(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Node(NodeError::Unreachable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Body of `POST /api/transactions`
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitTransaction {
    pub contract_id: String,
    pub transaction: LedgerTransaction,
}

fn node(state: &AppState, name: &str) -> Result<Arc<dyn NodeService>, ApiError> {
    state
        .nodes
        .get(name)
        .ok_or_else(|| ApiError::UnknownNode(name.to_string()))
}

async fn list_nodes(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.nodes.names())
}

async fn node_identity(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Party>, ApiError> {
    Ok(Json(node(&state, &name)?.identity()?))
}

async fn node_notaries(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Party>>, ApiError> {
    Ok(Json(node(&state, &name)?.notaries()?))
}

async fn node_flows(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(node(&state, &name)?.flows()?))
}

async fn node_addresses(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<NetworkHostAndPort>>, ApiError> {
    Ok(Json(node(&state, &name)?.addresses()?))
}

/// Handles transaction submission
///
/// 1. Runs the transaction through the contract named by `contract_id`
/// 2. If accepted: records the produced states and returns an accepted receipt,
///    unless its inputs are not the latest recorded versions or it re-issues a
///    recorded agreement
/// 3. If rejected: returns a rejected receipt carrying the failed rule and reason
async fn submit_transaction(
    State(state): State<AppState>,
    Json(request): Json<SubmitTransaction>,
) -> Result<Json<SubmissionReceipt>, ApiError> {
    let SubmitTransaction {
        contract_id,
        transaction,
    } = request;
    info!(
        "Processing {} transaction with commands {:?}",
        contract_id, transaction.commands
    );

    let status = match state.registry.verify(&contract_id, &transaction) {
        Ok(()) => match state.state_cache.record(&transaction).await {
            Ok(()) => {
                info!("Transaction for {} accepted and recorded", contract_id);
                SubmissionStatus::Accepted
            }
            Err(conflict) => {
                warn!(
                    "Transaction for {} conflicts with recorded state: {}",
                    contract_id, conflict
                );
                SubmissionStatus::Rejected {
                    rule: conflict.rule().to_string(),
                    reason: conflict.to_string(),
                }
            }
        },
        Err(RegistryError::UnknownContract(id)) => return Err(ApiError::UnknownContract(id)),
        // Rejection is still a successful call; the receipt says why
        Err(RegistryError::Rejected(failure)) => {
            warn!("Transaction for {} rejected: {}", contract_id, failure);
            SubmissionStatus::Rejected {
                rule: failure.rule().to_string(),
                reason: failure.to_string(),
            }
        }
    };

    Ok(Json(SubmissionReceipt {
        contract_id,
        status,
        timestamp: chrono::Utc::now(),
    }))
}

async fn get_state(
    State(state): State<AppState>,
    Path(linear_id): Path<Uuid>,
) -> Result<Json<AccordanceState>, ApiError> {
    state
        .state_cache
        .get(&linear_id)
        .await
        .map(Json)
        .ok_or(ApiError::UnknownState(linear_id))
}
