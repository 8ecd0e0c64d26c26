// src/gateway.rs
use crate::config::ContractAddresses;
use crate::{Reserve, Token, TokenFactory, VeristableAvs};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::providers::Middleware;
use ethers::types::{Address, TransactionReceipt, TxHash, U256, U64};
use std::sync::Arc;

/// Typed call surface over the factory, token, reserve and AVS contracts.
///
/// Writes resolve once the transaction is included and return its hash.
#[async_trait]
pub trait ContractGateway: Send + Sync + 'static {
    async fn create_token(&self, name: &str, symbol: &str, owner: Address) -> Result<TxHash>;
    async fn tokens_by_user(&self, user: Address) -> Result<Vec<Address>>;
    async fn user_token_count(&self, user: Address) -> Result<U256>;
    async fn add_avs_token(&self, token: Address) -> Result<TxHash>;
    async fn remove_avs_token(&self, token: Address) -> Result<TxHash>;

    async fn mint(&self, token: Address, to: Address, amount: U256) -> Result<TxHash>;
    async fn burn(&self, token: Address, amount: U256) -> Result<TxHash>;
    async fn transfer_token_ownership(&self, token: Address, new_owner: Address) -> Result<TxHash>;
    async fn token_owner(&self, token: Address) -> Result<Address>;
    async fn token_symbol(&self, token: Address) -> Result<String>;
    async fn balance_of(&self, token: Address, account: Address) -> Result<U256>;

    async fn set_reserve_balance(&self, token: Address, amount: U256) -> Result<TxHash>;
    async fn reserve_balance(&self, token: Address) -> Result<U256>;
    async fn last_reserve_update(&self) -> Result<U256>;

    async fn stake_for_token(&self, token: Address, value: U256) -> Result<TxHash>;
    async fn unstake_from_token(&self, token: Address, amount: U256) -> Result<TxHash>;
    async fn claim_token_rewards(&self, token: Address) -> Result<TxHash>;
    async fn distribute_token_rewards(&self, token: Address, value: U256) -> Result<TxHash>;
    async fn pause(&self) -> Result<TxHash>;
    async fn unpause(&self) -> Result<TxHash>;
    async fn transfer_avs_ownership(&self, new_owner: Address) -> Result<TxHash>;
    async fn paused(&self) -> Result<bool>;
    async fn avs_owner(&self) -> Result<Address>;
    async fn token_stake(&self, token: Address, staker: Address) -> Result<U256>;
    async fn total_token_stakes(&self, token: Address) -> Result<U256>;
    async fn token_rewards_pool(&self, token: Address) -> Result<U256>;
    async fn pending_token_rewards(&self, token: Address, staker: Address) -> Result<U256>;
    async fn min_token_stake(&self) -> Result<U256>;
}

pub struct EthersGateway<M> {
    client: Arc<M>,
    factory: TokenFactory<M>,
    reserve: Reserve<M>,
    avs: VeristableAvs<M>,
    gas_limit: U256,
}

impl<M: Middleware + 'static> EthersGateway<M> {
    pub fn new(client: Arc<M>, contracts: &ContractAddresses, gas_limit: U256) -> Self {
        Self {
            factory: TokenFactory::new(contracts.factory, client.clone()),
            reserve: Reserve::new(contracts.reserve, client.clone()),
            avs: VeristableAvs::new(contracts.avs, client.clone()),
            client,
            gas_limit,
        }
    }

    fn token(&self, address: Address) -> Token<M> {
        Token::new(address, self.client.clone())
    }
}

async fn submit<M, D>(call: ContractCall<M, D>) -> Result<TxHash>
where
    M: Middleware + 'static,
    D: Detokenize + Send + Sync,
{
    let pending = call.send().await?;
    let tx_hash = *pending;
    included(tx_hash, pending.await?)
}

/// A missing receipt means the node dropped the transaction; status 0 means it reverted.
fn included(tx_hash: TxHash, receipt: Option<TransactionReceipt>) -> Result<TxHash> {
    let receipt =
        receipt.ok_or_else(|| anyhow!("transaction {:?} was dropped before inclusion", tx_hash))?;

    if receipt.status == Some(U64::zero()) {
        bail!("transaction {:?} reverted", tx_hash);
    }
    Ok(receipt.transaction_hash)
}

#[async_trait]
impl<M: Middleware + 'static> ContractGateway for EthersGateway<M> {
    async fn create_token(&self, name: &str, symbol: &str, owner: Address) -> Result<TxHash> {
        let call = self
            .factory
            .create_token(name.to_string(), symbol.to_string(), owner)
            .gas(self.gas_limit);
        submit(call).await
    }

    async fn tokens_by_user(&self, user: Address) -> Result<Vec<Address>> {
        Ok(self.factory.get_tokens_by_user(user).call().await?)
    }

    async fn user_token_count(&self, user: Address) -> Result<U256> {
        Ok(self.factory.get_user_token_count(user).call().await?)
    }

    async fn add_avs_token(&self, token: Address) -> Result<TxHash> {
        submit(self.factory.add_to_avs_tokens(token)).await
    }

    async fn remove_avs_token(&self, token: Address) -> Result<TxHash> {
        submit(self.factory.remove_from_avs_tokens(token)).await
    }

    async fn mint(&self, token: Address, to: Address, amount: U256) -> Result<TxHash> {
        submit(self.token(token).mint(to, amount)).await
    }

    async fn burn(&self, token: Address, amount: U256) -> Result<TxHash> {
        submit(self.token(token).burn(amount)).await
    }

    async fn transfer_token_ownership(&self, token: Address, new_owner: Address) -> Result<TxHash> {
        submit(self.token(token).transfer_ownership(new_owner)).await
    }

    async fn token_owner(&self, token: Address) -> Result<Address> {
        Ok(self.token(token).owner().call().await?)
    }

    async fn token_symbol(&self, token: Address) -> Result<String> {
        Ok(self.token(token).symbol().call().await?)
    }

    async fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        Ok(self.token(token).balance_of(account).call().await?)
    }

    async fn set_reserve_balance(&self, token: Address, amount: U256) -> Result<TxHash> {
        submit(self.reserve.set_reserve_balance(token, amount)).await
    }

    async fn reserve_balance(&self, token: Address) -> Result<U256> {
        Ok(self.reserve.get_reserve_balance(token).call().await?)
    }

    async fn last_reserve_update(&self) -> Result<U256> {
        Ok(self.reserve.get_last_update_timestamp().call().await?)
    }

    async fn stake_for_token(&self, token: Address, value: U256) -> Result<TxHash> {
        submit(self.avs.stake_for_token(token).value(value)).await
    }

    async fn unstake_from_token(&self, token: Address, amount: U256) -> Result<TxHash> {
        submit(self.avs.unstake_from_token(token, amount)).await
    }

    async fn claim_token_rewards(&self, token: Address) -> Result<TxHash> {
        submit(self.avs.claim_token_rewards(token)).await
    }

    async fn distribute_token_rewards(&self, token: Address, value: U256) -> Result<TxHash> {
        submit(self.avs.distribute_token_rewards(token).value(value)).await
    }

    async fn pause(&self) -> Result<TxHash> {
        submit(self.avs.pause()).await
    }

    async fn unpause(&self) -> Result<TxHash> {
        submit(self.avs.unpause()).await
    }

    async fn transfer_avs_ownership(&self, new_owner: Address) -> Result<TxHash> {
        submit(self.avs.transfer_ownership(new_owner)).await
    }

    async fn paused(&self) -> Result<bool> {
        Ok(self.avs.paused().call().await?)
    }

    async fn avs_owner(&self) -> Result<Address> {
        Ok(self.avs.owner().call().await?)
    }

    async fn token_stake(&self, token: Address, staker: Address) -> Result<U256> {
        Ok(self.avs.token_stakes(token, staker).call().await?)
    }

    async fn total_token_stakes(&self, token: Address) -> Result<U256> {
        Ok(self.avs.total_token_stakes(token).call().await?)
    }

    async fn token_rewards_pool(&self, token: Address) -> Result<U256> {
        Ok(self.avs.token_rewards_pools(token).call().await?)
    }

    async fn pending_token_rewards(&self, token: Address, staker: Address) -> Result<U256> {
        Ok(self.avs.pending_token_rewards(token, staker).call().await?)
    }

    async fn min_token_stake(&self) -> Result<U256> {
        Ok(self.avs.min_token_stake().call().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(status: u64) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: TxHash::repeat_byte(0x0c),
            status: Some(U64::from(status)),
            ..Default::default()
        }
    }

    #[test]
    fn successful_receipt_yields_its_hash() {
        let tx = included(TxHash::repeat_byte(0x0c), Some(receipt(1))).unwrap();
        assert_eq!(tx, TxHash::repeat_byte(0x0c));
    }

    #[test]
    fn reverted_receipt_is_an_error() {
        let err = included(TxHash::repeat_byte(0x0c), Some(receipt(0))).unwrap_err();
        assert!(err.to_string().ends_with("reverted"));
    }

    #[test]
    fn missing_receipt_means_dropped() {
        let err = included(TxHash::repeat_byte(0x0c), None).unwrap_err();
        assert!(err.to_string().contains("dropped before inclusion"));
    }
}
