// src/api.rs
use crate::dashboard::Dashboard;
use crate::error::{DashboardError, DashboardResult};
use crate::view::ViewState;
use crate::wallet::WalletConnector;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type Shared<C> = State<Arc<Dashboard<C>>>;
type Reply = Result<Json<Outcome>, DashboardError>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SelectTokenRequest {
    pub token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTokenRequest {
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AmountRequest {
    pub amount: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddressRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct Outcome {
    pub message: String,
    pub state: ViewState,
}

#[derive(Debug, Serialize)]
pub struct OwnerReply {
    pub owner: Address,
}

pub fn router<C: WalletConnector>(dashboard: Arc<Dashboard<C>>) -> Router {
    Router::new()
        .route("/state", get(state::<C>))
        .route("/connect", post(connect::<C>))
        .route("/token/select", post(select_token::<C>))
        .route("/token/owner", get(token_owner::<C>))
        .route("/token/create", post(create_token::<C>))
        .route("/token/mint", post(mint::<C>))
        .route("/token/burn", post(burn::<C>))
        .route("/token/transfer-ownership", post(transfer_token_ownership::<C>))
        .route("/reserve", post(set_reserve_balance::<C>))
        .route("/stake", post(stake::<C>))
        .route("/unstake", post(unstake::<C>))
        .route("/rewards/claim", post(claim_rewards::<C>))
        .route("/rewards/distribute", post(distribute_rewards::<C>))
        .route("/avs/tokens/add", post(add_avs_token::<C>))
        .route("/avs/tokens/remove", post(remove_avs_token::<C>))
        .route("/admin/pause", post(pause::<C>))
        .route("/admin/unpause", post(unpause::<C>))
        .route("/admin/transfer-ownership", post(transfer_ownership::<C>))
        .with_state(dashboard)
}

async fn reply<C: WalletConnector>(dashboard: &Dashboard<C>, result: DashboardResult<String>) -> Reply {
    let message = result?;
    Ok(Json(Outcome {
        message,
        state: dashboard.state().await,
    }))
}

async fn state<C: WalletConnector>(State(dashboard): Shared<C>) -> Json<ViewState> {
    Json(dashboard.state().await)
}

async fn connect<C: WalletConnector>(State(dashboard): Shared<C>) -> Reply {
    let result = dashboard.connect().await;
    reply(&dashboard, result).await
}

async fn select_token<C: WalletConnector>(
    State(dashboard): Shared<C>,
    Json(req): Json<SelectTokenRequest>,
) -> Reply {
    let result = dashboard.select_token(&req.token).await;
    reply(&dashboard, result).await
}

async fn token_owner<C: WalletConnector>(
    State(dashboard): Shared<C>,
) -> Result<Json<OwnerReply>, DashboardError> {
    let owner = dashboard.check_token_owner().await?;
    Ok(Json(OwnerReply { owner }))
}

async fn create_token<C: WalletConnector>(
    State(dashboard): Shared<C>,
    Json(req): Json<CreateTokenRequest>,
) -> Reply {
    let result = dashboard.create_token(&req.name, &req.symbol).await;
    reply(&dashboard, result).await
}

async fn mint<C: WalletConnector>(State(dashboard): Shared<C>, Json(req): Json<AmountRequest>) -> Reply {
    let result = dashboard.mint(&req.amount).await;
    reply(&dashboard, result).await
}

async fn burn<C: WalletConnector>(State(dashboard): Shared<C>, Json(req): Json<AmountRequest>) -> Reply {
    let result = dashboard.burn(&req.amount).await;
    reply(&dashboard, result).await
}

async fn transfer_token_ownership<C: WalletConnector>(
    State(dashboard): Shared<C>,
    Json(req): Json<AddressRequest>,
) -> Reply {
    let result = dashboard.transfer_token_ownership(&req.address).await;
    reply(&dashboard, result).await
}

async fn set_reserve_balance<C: WalletConnector>(
    State(dashboard): Shared<C>,
    Json(req): Json<AmountRequest>,
) -> Reply {
    let result = dashboard.set_reserve_balance(&req.amount).await;
    reply(&dashboard, result).await
}

async fn stake<C: WalletConnector>(State(dashboard): Shared<C>, Json(req): Json<AmountRequest>) -> Reply {
    let result = dashboard.stake_for_token(&req.amount).await;
    reply(&dashboard, result).await
}

async fn unstake<C: WalletConnector>(State(dashboard): Shared<C>, Json(req): Json<AmountRequest>) -> Reply {
    let result = dashboard.unstake_from_token(&req.amount).await;
    reply(&dashboard, result).await
}

async fn claim_rewards<C: WalletConnector>(State(dashboard): Shared<C>) -> Reply {
    let result = dashboard.claim_token_rewards().await;
    reply(&dashboard, result).await
}

async fn distribute_rewards<C: WalletConnector>(
    State(dashboard): Shared<C>,
    Json(req): Json<AmountRequest>,
) -> Reply {
    let result = dashboard.distribute_token_rewards(&req.amount).await;
    reply(&dashboard, result).await
}

async fn add_avs_token<C: WalletConnector>(
    State(dashboard): Shared<C>,
    Json(req): Json<AddressRequest>,
) -> Reply {
    let result = dashboard.add_avs_token(&req.address).await;
    reply(&dashboard, result).await
}

async fn remove_avs_token<C: WalletConnector>(
    State(dashboard): Shared<C>,
    Json(req): Json<AddressRequest>,
) -> Reply {
    let result = dashboard.remove_avs_token(&req.address).await;
    reply(&dashboard, result).await
}

async fn pause<C: WalletConnector>(State(dashboard): Shared<C>) -> Reply {
    let result = dashboard.pause().await;
    reply(&dashboard, result).await
}

async fn unpause<C: WalletConnector>(State(dashboard): Shared<C>) -> Reply {
    let result = dashboard.unpause().await;
    reply(&dashboard, result).await
}

async fn transfer_ownership<C: WalletConnector>(
    State(dashboard): Shared<C>,
    Json(req): Json<AddressRequest>,
) -> Reply {
    let result = dashboard.transfer_ownership(&req.address).await;
    reply(&dashboard, result).await
}
