// src/wallet.rs
use crate::config::{Config, ContractAddresses};
use crate::gateway::{ContractGateway, EthersGateway};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, U256};
use std::sync::Arc;

/// A bound signing context: the account it signs for and the gateway that signs through it.
pub struct Connection<G> {
    pub account: Address,
    pub gateway: G,
}

#[async_trait]
pub trait WalletConnector: Send + Sync + 'static {
    type Gateway: ContractGateway;

    /// Requests account access. Rejections and missing wallets surface as errors and are not retried.
    async fn connect(&self) -> Result<Connection<Self::Gateway>>;
}

/// Signs locally with a configured private key.
pub struct LocalKeyWallet {
    provider: Provider<Http>,
    wallet: LocalWallet,
    contracts: ContractAddresses,
    gas_limit: U256,
}

impl LocalKeyWallet {
    pub fn new(config: &Config, private_key: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())?;
        let key = private_key.trim();
        let wallet = key
            .strip_prefix("0x")
            .unwrap_or(key)
            .parse::<LocalWallet>()
            .map_err(|_| anyhow!("PRIVATE_KEY is not a valid secp256k1 key"))?;

        Ok(Self {
            provider,
            wallet,
            contracts: config.contracts,
            gas_limit: config.gas_limit,
        })
    }
}

#[async_trait]
impl WalletConnector for LocalKeyWallet {
    type Gateway = EthersGateway<SignerMiddleware<Provider<Http>, LocalWallet>>;

    async fn connect(&self) -> Result<Connection<Self::Gateway>> {
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .context("could not reach the RPC endpoint")?;
        let wallet = self.wallet.clone().with_chain_id(chain_id.as_u64());
        let account = wallet.address();

        let client = Arc::new(SignerMiddleware::new(self.provider.clone(), wallet));
        tracing::info!(account = ?account, chain_id = chain_id.as_u64(), "Local key bound");

        Ok(Connection {
            account,
            gateway: EthersGateway::new(client, &self.contracts, self.gas_limit),
        })
    }
}

/// Delegates signing to the wallet behind the RPC endpoint via `eth_requestAccounts`.
pub struct RpcAccountWallet<P = Http> {
    provider: Provider<P>,
    contracts: ContractAddresses,
    gas_limit: U256,
}

impl RpcAccountWallet<Http> {
    pub fn new(config: &Config) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())?;
        Ok(Self::with_provider(provider, config.contracts, config.gas_limit))
    }
}

impl<P: JsonRpcClient> RpcAccountWallet<P> {
    pub fn with_provider(provider: Provider<P>, contracts: ContractAddresses, gas_limit: U256) -> Self {
        Self {
            provider,
            contracts,
            gas_limit,
        }
    }
}

#[async_trait]
impl<P: JsonRpcClient + Clone + 'static> WalletConnector for RpcAccountWallet<P> {
    type Gateway = EthersGateway<Provider<P>>;

    async fn connect(&self) -> Result<Connection<Self::Gateway>> {
        let accounts: Vec<Address> = self
            .provider
            .request("eth_requestAccounts", Vec::<serde_json::Value>::new())
            .await
            .context("wallet rejected the account request")?;

        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| anyhow!("No wallet detected"))?;

        let client = Arc::new(self.provider.clone().with_sender(account));
        tracing::info!(account = ?account, "RPC wallet account bound");

        Ok(Connection {
            account,
            gateway: EthersGateway::new(client, &self.contracts, self.gas_limit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::read_contract_addresses;
    use ethers::providers::MockProvider;

    fn wallet() -> (RpcAccountWallet<MockProvider>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        let contracts = read_contract_addresses().unwrap();
        (RpcAccountWallet::with_provider(provider, contracts, U256::from(3_000_000u64)), mock)
    }

    #[tokio::test]
    async fn empty_account_list_means_no_wallet() {
        let (wallet, mock) = wallet();
        mock.push::<Vec<Address>, _>(Vec::new()).unwrap();

        let err = match wallet.connect().await {
            Ok(_) => panic!("connected without an account"),
            Err(err) => err,
        };
        assert_eq!(err.to_string(), "No wallet detected");
    }

    #[tokio::test]
    async fn first_account_is_bound() {
        let (wallet, mock) = wallet();
        let first = Address::repeat_byte(0x0a);
        mock.push::<Vec<Address>, _>(vec![first, Address::repeat_byte(0x0b)]).unwrap();

        let connection = match wallet.connect().await {
            Ok(connection) => connection,
            Err(err) => panic!("connect failed: {:#}", err),
        };
        assert_eq!(connection.account, first);
    }

    #[tokio::test]
    async fn failed_account_request_is_reported() {
        let (wallet, _mock) = wallet();

        let err = match wallet.connect().await {
            Ok(_) => panic!("connected without a wallet response"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("wallet rejected the account request"));
    }
}
