use accordance::{
    api::{AppState, Server},
    config::Config,
    node::NodeServices,
    registry::ContractRegistry,
    state::StateCache,
};
use tracing::info;

/// The main entry point for the accordance service.
///
/// Loads the configuration named by the first argument (default
/// `config/default.toml`), registers the configured node services and the
/// built-in contracts, and serves the HTTP API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());
    let config = Config::load(&path)?;
    info!("Accordance service starting with config: {:?}", config);

    let nodes = NodeServices::from_config(&config.nodes);
    let registry = ContractRegistry::with_defaults();
    info!(
        "Serving {} nodes, contracts: {:?}",
        nodes.len(),
        registry.contract_ids()
    );

    let state = AppState::new(registry, nodes, StateCache::new());
    let server = Server::new(config.api, state);
    server.start().await?;

    Ok(())
}
