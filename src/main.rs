// src/main.rs
use anyhow::Result as AnyhowResult;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veristable_admin::api;
use veristable_admin::config::Config;
use veristable_admin::dashboard::Dashboard;
use veristable_admin::wallet::{LocalKeyWallet, RpcAccountWallet, WalletConnector};

#[tokio::main]
async fn main() -> AnyhowResult<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veristable_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        rpc_url = %config.rpc_url,
        factory = ?config.contracts.factory,
        reserve = ?config.contracts.reserve,
        avs = ?config.contracts.avs,
        "Configuration loaded"
    );

    match config.private_key.as_deref() {
        Some(key) => serve(&config, LocalKeyWallet::new(&config, key)?).await,
        None => {
            tracing::info!("PRIVATE_KEY not set, signing through the RPC wallet");
            serve(&config, RpcAccountWallet::new(&config)?).await
        }
    }
}

async fn serve<C: WalletConnector>(config: &Config, connector: C) -> AnyhowResult<()> {
    let dashboard = Arc::new(Dashboard::new(connector));
    let app = api::router(dashboard);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");
    axum::serve(listener, app).await?;

    Ok(())
}
