// src/dashboard.rs
use crate::error::{DashboardError, DashboardResult};
use crate::gateway::ContractGateway;
use crate::utils::{format_ether, format_timestamp, parse_address, parse_amount, require_text};
use crate::view::{TokenFigures, ViewState};
use crate::wallet::{Connection, WalletConnector};
use ethers::types::{Address, TxHash};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// Dependent state re-read after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    UserTokens,
    ContractStatus,
    Reserve(Address),
    TokenInfo(Address),
    TokenOwner(Address),
}

type Session<C> = Arc<Connection<<C as WalletConnector>::Gateway>>;

pub struct Dashboard<C: WalletConnector> {
    connector: C,
    session: RwLock<Option<Session<C>>>,
    view: RwLock<ViewState>,
    slot: Mutex<()>,
    busy: AtomicBool,
}

/// Holds the operation slot; releasing it clears the published busy flag.
struct OperationGuard<'a> {
    _slot: MutexGuard<'a, ()>,
    busy: &'a AtomicBool,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

fn fail(action: &'static str, err: anyhow::Error) -> DashboardError {
    tracing::error!(action, "operation failed: {:#}", err);
    DashboardError::failed(action, err)
}

impl<C: WalletConnector> Dashboard<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            session: RwLock::new(None),
            view: RwLock::new(ViewState::default()),
            slot: Mutex::new(()),
            busy: AtomicBool::new(false),
        }
    }

    pub async fn state(&self) -> ViewState {
        let mut view = self.view.read().await.clone();
        view.busy = self.is_busy();
        view
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn begin(&self) -> DashboardResult<OperationGuard<'_>> {
        let slot = self.slot.try_lock().map_err(|_| DashboardError::Busy)?;
        self.busy.store(true, Ordering::SeqCst);
        Ok(OperationGuard {
            _slot: slot,
            busy: &self.busy,
        })
    }

    async fn session(&self) -> DashboardResult<Session<C>> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(DashboardError::NotConnected)
    }

    async fn selected_token(&self) -> DashboardResult<Address> {
        self.view
            .read()
            .await
            .selected_token
            .ok_or_else(|| DashboardError::invalid("select a token first"))
    }

    pub async fn connect(&self) -> DashboardResult<String> {
        let _guard = self.begin()?;
        let connection = self
            .connector
            .connect()
            .await
            .map_err(|err| fail("connect wallet", err))?;

        let account = connection.account;
        let session = Arc::new(connection);
        *self.session.write().await = Some(session.clone());
        *self.view.write().await = ViewState {
            account: Some(account),
            ..ViewState::default()
        };

        tokio::join!(
            self.sync(&session, Refresh::UserTokens),
            self.sync(&session, Refresh::ContractStatus),
        );

        tracing::info!(account = ?account, "Wallet connected");
        Ok(format!("Connected as {:?}", account))
    }

    /// Selects a token from the user's list and pulls its reserve and staking figures.
    pub async fn select_token(&self, token: &str) -> DashboardResult<String> {
        let token = parse_address(token)?;
        let session = self.session().await?;
        let _guard = self.begin()?;

        {
            let mut view = self.view.write().await;
            if !view.owns_token(&token) {
                return Err(DashboardError::invalid(format!(
                    "{:?} is not one of your tokens",
                    token
                )));
            }
            view.selected_token = Some(token);
            view.token_owner = None;
        }

        tokio::join!(
            self.sync(&session, Refresh::Reserve(token)),
            self.sync(&session, Refresh::TokenInfo(token)),
        );
        Ok(format!("Selected {:?}", token))
    }

    pub async fn check_token_owner(&self) -> DashboardResult<Address> {
        let token = self.selected_token().await?;
        let session = self.session().await?;

        let owner = session
            .gateway
            .token_owner(token)
            .await
            .map_err(|err| fail("check token owner", err))?;
        let mut view = self.view.write().await;
        if view.selected_token == Some(token) {
            view.token_owner = Some(owner);
        }
        Ok(owner)
    }

    pub async fn create_token(&self, name: &str, symbol: &str) -> DashboardResult<String> {
        let name = require_text(name, "token name")?.to_string();
        let symbol = require_text(symbol, "token symbol")?.to_string();

        self.transact("create token", Refresh::UserTokens, move |session| async move {
            session
                .gateway
                .create_token(&name, &symbol, session.account)
                .await
        })
        .await
        .map(|tx| confirmed("Token created", tx))
    }

    pub async fn mint(&self, amount: &str) -> DashboardResult<String> {
        let amount = parse_amount(amount)?;
        let token = self.selected_token().await?;

        self.transact("mint tokens", Refresh::TokenInfo(token), move |session| async move {
            session.gateway.mint(token, session.account, amount).await
        })
        .await
        .map(|tx| confirmed("Tokens minted", tx))
    }

    pub async fn burn(&self, amount: &str) -> DashboardResult<String> {
        let amount = parse_amount(amount)?;
        let token = self.selected_token().await?;

        self.transact("burn tokens", Refresh::TokenInfo(token), move |session| async move {
            session.gateway.burn(token, amount).await
        })
        .await
        .map(|tx| confirmed("Tokens burned", tx))
    }

    pub async fn transfer_token_ownership(&self, new_owner: &str) -> DashboardResult<String> {
        let new_owner = parse_address(new_owner)?;
        let token = self.selected_token().await?;

        self.transact(
            "transfer token ownership",
            Refresh::TokenOwner(token),
            move |session| async move {
                session.gateway.transfer_token_ownership(token, new_owner).await
            },
        )
        .await
        .map(|tx| confirmed("Token ownership transferred", tx))
    }

    pub async fn set_reserve_balance(&self, amount: &str) -> DashboardResult<String> {
        let amount = parse_amount(amount)?;
        let token = self.selected_token().await?;

        self.transact("set reserve balance", Refresh::Reserve(token), move |session| async move {
            session.gateway.set_reserve_balance(token, amount).await
        })
        .await
        .map(|tx| confirmed("Reserve balance updated", tx))
    }

    pub async fn stake_for_token(&self, amount: &str) -> DashboardResult<String> {
        let value = parse_amount(amount)?;
        let token = self.selected_token().await?;

        self.transact("stake", Refresh::TokenInfo(token), move |session| async move {
            session.gateway.stake_for_token(token, value).await
        })
        .await
        .map(|tx| confirmed("Stake placed", tx))
    }

    pub async fn unstake_from_token(&self, amount: &str) -> DashboardResult<String> {
        let amount = parse_amount(amount)?;
        let token = self.selected_token().await?;

        self.transact("unstake", Refresh::TokenInfo(token), move |session| async move {
            session.gateway.unstake_from_token(token, amount).await
        })
        .await
        .map(|tx| confirmed("Stake withdrawn", tx))
    }

    pub async fn claim_token_rewards(&self) -> DashboardResult<String> {
        let token = self.selected_token().await?;

        self.transact("claim rewards", Refresh::TokenInfo(token), move |session| async move {
            session.gateway.claim_token_rewards(token).await
        })
        .await
        .map(|tx| confirmed("Rewards claimed", tx))
    }

    pub async fn distribute_token_rewards(&self, amount: &str) -> DashboardResult<String> {
        let value = parse_amount(amount)?;
        let token = self.selected_token().await?;

        self.transact("distribute rewards", Refresh::TokenInfo(token), move |session| async move {
            session.gateway.distribute_token_rewards(token, value).await
        })
        .await
        .map(|tx| confirmed("Rewards distributed", tx))
    }

    pub async fn add_avs_token(&self, token: &str) -> DashboardResult<String> {
        let token = parse_address(token)?;

        self.transact("add AVS token", Refresh::UserTokens, move |session| async move {
            session.gateway.add_avs_token(token).await
        })
        .await
        .map(|tx| confirmed("Token added to AVS", tx))
    }

    pub async fn remove_avs_token(&self, token: &str) -> DashboardResult<String> {
        let token = parse_address(token)?;

        self.transact("remove AVS token", Refresh::UserTokens, move |session| async move {
            session.gateway.remove_avs_token(token).await
        })
        .await
        .map(|tx| confirmed("Token removed from AVS", tx))
    }

    pub async fn pause(&self) -> DashboardResult<String> {
        let session = self.session().await?;
        let _guard = self.begin()?;
        if self.view.read().await.contract_paused {
            return Err(DashboardError::invalid("contract is already paused"));
        }

        self.run(session, "pause contract", Refresh::ContractStatus, |session| async move {
            session.gateway.pause().await
        })
        .await
        .map(|tx| confirmed("Contract paused", tx))
    }

    pub async fn unpause(&self) -> DashboardResult<String> {
        let session = self.session().await?;
        let _guard = self.begin()?;
        if !self.view.read().await.contract_paused {
            return Err(DashboardError::invalid("contract is not paused"));
        }

        self.run(session, "unpause contract", Refresh::ContractStatus, |session| async move {
            session.gateway.unpause().await
        })
        .await
        .map(|tx| confirmed("Contract unpaused", tx))
    }

    pub async fn transfer_ownership(&self, new_owner: &str) -> DashboardResult<String> {
        let new_owner = parse_address(new_owner)?;

        self.transact("transfer ownership", Refresh::ContractStatus, move |session| async move {
            session.gateway.transfer_avs_ownership(new_owner).await
        })
        .await
        .map(|tx| confirmed("Ownership transferred", tx))
    }

    /// Runs one write inside the operation slot and refreshes its dependent state once on success.
    async fn transact<F, Fut>(
        &self,
        action: &'static str,
        refresh: Refresh,
        call: F,
    ) -> DashboardResult<TxHash>
    where
        F: FnOnce(Session<C>) -> Fut,
        Fut: Future<Output = anyhow::Result<TxHash>>,
    {
        let session = self.session().await?;
        let _guard = self.begin()?;
        self.run(session, action, refresh, call).await
    }

    /// Submits one write; the caller already holds the operation slot.
    async fn run<F, Fut>(
        &self,
        session: Session<C>,
        action: &'static str,
        refresh: Refresh,
        call: F,
    ) -> DashboardResult<TxHash>
    where
        F: FnOnce(Session<C>) -> Fut,
        Fut: Future<Output = anyhow::Result<TxHash>>,
    {
        let tx_hash = call(session.clone()).await.map_err(|err| fail(action, err))?;
        tracing::info!(action, tx = ?tx_hash, "Transaction included");

        self.sync(&session, refresh).await;
        Ok(tx_hash)
    }

    async fn sync(&self, session: &Connection<C::Gateway>, refresh: Refresh) {
        if let Err(err) = self.pull(session, refresh).await {
            tracing::warn!(?refresh, "refresh failed: {:#}", err);
        }
    }

    async fn pull(&self, session: &Connection<C::Gateway>, refresh: Refresh) -> anyhow::Result<()> {
        let gateway = &session.gateway;
        let account = session.account;

        match refresh {
            Refresh::UserTokens => {
                let (tokens, count) = tokio::try_join!(
                    gateway.tokens_by_user(account),
                    gateway.user_token_count(account),
                )?;
                let mut view = self.view.write().await;
                view.user_tokens = tokens;
                view.user_token_count = count.to_string();
            }
            Refresh::ContractStatus => {
                let (paused, owner) = tokio::try_join!(gateway.paused(), gateway.avs_owner())?;
                let mut view = self.view.write().await;
                view.contract_paused = paused;
                view.contract_owner = Some(owner);
            }
            Refresh::Reserve(token) => {
                let (balance, updated_at) = tokio::try_join!(
                    gateway.reserve_balance(token),
                    gateway.last_reserve_update(),
                )?;
                let mut view = self.view.write().await;
                if view.selected_token != Some(token) {
                    return Ok(());
                }
                view.reserve_balance = format_ether(balance);
                view.last_update = format_timestamp(updated_at);
            }
            Refresh::TokenInfo(token) => {
                let (symbol, balance, stake, total, pool, pending, min_stake) = tokio::try_join!(
                    gateway.token_symbol(token),
                    gateway.balance_of(token, account),
                    gateway.token_stake(token, account),
                    gateway.total_token_stakes(token),
                    gateway.token_rewards_pool(token),
                    gateway.pending_token_rewards(token, account),
                    gateway.min_token_stake(),
                )?;
                let figures = TokenFigures {
                    symbol,
                    user_balance: format_ether(balance),
                    stake: format_ether(stake),
                    total_staked: format_ether(total),
                    rewards_pool: format_ether(pool),
                    pending_rewards: format_ether(pending),
                    min_stake: format_ether(min_stake),
                };
                let mut view = self.view.write().await;
                if view.selected_token == Some(token) {
                    figures.apply(&mut view);
                }
            }
            Refresh::TokenOwner(token) => {
                let owner = gateway.token_owner(token).await?;
                let mut view = self.view.write().await;
                if view.selected_token == Some(token) {
                    view.token_owner = Some(owner);
                }
            }
        }
        Ok(())
    }
}

fn confirmed(what: &str, tx_hash: TxHash) -> String {
    format!("{} (tx {:?})", what, tx_hash)
}
