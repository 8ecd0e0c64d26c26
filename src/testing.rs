// src/testing.rs
use crate::gateway::ContractGateway;
use crate::wallet::{Connection, WalletConnector};
use anyhow::{Result, bail};
use async_trait::async_trait;
use ethers::types::{Address, H160, TxHash, U256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const TEST_ACCOUNT: Address = H160([0x11; 20]);
pub const OWNED_TOKEN: Address = H160([0x22; 20]);

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<&'static str>>,
    tokens: Mutex<Vec<Address>>,
    paused: AtomicBool,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    hold: Mutex<Option<Arc<Notify>>>,
}

/// In-memory gateway that records every call by method name.
#[derive(Clone)]
pub struct FakeGateway {
    inner: Arc<Recorder>,
}

impl FakeGateway {
    pub fn new() -> Self {
        let recorder = Recorder::default();
        recorder.tokens.lock().unwrap().push(OWNED_TOKEN);
        Self {
            inner: Arc::new(recorder),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|call| **call == method).count()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Parks every write until `release` is notified.
    pub fn hold_writes(&self, release: Arc<Notify>) {
        *self.inner.hold.lock().unwrap() = Some(release);
    }

    async fn write(&self, method: &'static str) -> Result<TxHash> {
        self.inner.calls.lock().unwrap().push(method);
        let hold = self.inner.hold.lock().unwrap().clone();
        if let Some(release) = hold {
            release.notified().await;
        }
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            bail!("execution reverted");
        }
        Ok(TxHash::repeat_byte(0xab))
    }

    fn read(&self, method: &'static str) -> Result<()> {
        self.inner.calls.lock().unwrap().push(method);
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        Ok(())
    }
}

fn ether(tenths: u64) -> U256 {
    U256::from(tenths) * U256::exp10(17)
}

#[async_trait]
impl ContractGateway for FakeGateway {
    async fn create_token(&self, _name: &str, _symbol: &str, _owner: Address) -> Result<TxHash> {
        let tx = self.write("create_token").await?;
        let mut tokens = self.inner.tokens.lock().unwrap();
        let next = Address::from_low_u64_be(tokens.len() as u64 + 1);
        tokens.push(next);
        Ok(tx)
    }

    async fn tokens_by_user(&self, _user: Address) -> Result<Vec<Address>> {
        self.read("tokens_by_user")?;
        Ok(self.inner.tokens.lock().unwrap().clone())
    }

    async fn user_token_count(&self, _user: Address) -> Result<U256> {
        self.read("user_token_count")?;
        Ok(U256::from(self.inner.tokens.lock().unwrap().len()))
    }

    async fn add_avs_token(&self, _token: Address) -> Result<TxHash> {
        self.write("add_avs_token").await
    }

    async fn remove_avs_token(&self, _token: Address) -> Result<TxHash> {
        self.write("remove_avs_token").await
    }

    async fn mint(&self, _token: Address, _to: Address, _amount: U256) -> Result<TxHash> {
        self.write("mint").await
    }

    async fn burn(&self, _token: Address, _amount: U256) -> Result<TxHash> {
        self.write("burn").await
    }

    async fn transfer_token_ownership(&self, _token: Address, _new_owner: Address) -> Result<TxHash> {
        self.write("transfer_token_ownership").await
    }

    async fn token_owner(&self, _token: Address) -> Result<Address> {
        self.read("token_owner")?;
        Ok(TEST_ACCOUNT)
    }

    async fn token_symbol(&self, token: Address) -> Result<String> {
        self.read("token_symbol")?;
        if token == OWNED_TOKEN {
            Ok("VRS".to_string())
        } else {
            Ok(format!("T{}", token.to_low_u64_be()))
        }
    }

    async fn balance_of(&self, _token: Address, _account: Address) -> Result<U256> {
        self.read("balance_of")?;
        Ok(ether(50))
    }

    async fn set_reserve_balance(&self, _token: Address, _amount: U256) -> Result<TxHash> {
        self.write("set_reserve_balance").await
    }

    async fn reserve_balance(&self, _token: Address) -> Result<U256> {
        self.read("reserve_balance")?;
        Ok(ether(15))
    }

    async fn last_reserve_update(&self) -> Result<U256> {
        self.read("last_reserve_update")?;
        Ok(U256::from(1_700_000_000u64))
    }

    async fn stake_for_token(&self, _token: Address, _value: U256) -> Result<TxHash> {
        self.write("stake_for_token").await
    }

    async fn unstake_from_token(&self, _token: Address, _amount: U256) -> Result<TxHash> {
        self.write("unstake_from_token").await
    }

    async fn claim_token_rewards(&self, _token: Address) -> Result<TxHash> {
        self.write("claim_token_rewards").await
    }

    async fn distribute_token_rewards(&self, _token: Address, _value: U256) -> Result<TxHash> {
        self.write("distribute_token_rewards").await
    }

    async fn pause(&self) -> Result<TxHash> {
        let tx = self.write("pause").await?;
        self.inner.paused.store(true, Ordering::SeqCst);
        Ok(tx)
    }

    async fn unpause(&self) -> Result<TxHash> {
        let tx = self.write("unpause").await?;
        self.inner.paused.store(false, Ordering::SeqCst);
        Ok(tx)
    }

    async fn transfer_avs_ownership(&self, _new_owner: Address) -> Result<TxHash> {
        self.write("transfer_avs_ownership").await
    }

    async fn paused(&self) -> Result<bool> {
        self.read("paused")?;
        Ok(self.inner.paused.load(Ordering::SeqCst))
    }

    async fn avs_owner(&self) -> Result<Address> {
        self.read("avs_owner")?;
        Ok(TEST_ACCOUNT)
    }

    async fn token_stake(&self, _token: Address, _staker: Address) -> Result<U256> {
        self.read("token_stake")?;
        Ok(ether(2))
    }

    async fn total_token_stakes(&self, _token: Address) -> Result<U256> {
        self.read("total_token_stakes")?;
        Ok(ether(20))
    }

    async fn token_rewards_pool(&self, _token: Address) -> Result<U256> {
        self.read("token_rewards_pool")?;
        Ok(ether(3))
    }

    async fn pending_token_rewards(&self, _token: Address, _staker: Address) -> Result<U256> {
        self.read("pending_token_rewards")?;
        Ok(ether(1))
    }

    async fn min_token_stake(&self) -> Result<U256> {
        self.read("min_token_stake")?;
        Ok(ether(1))
    }
}

#[derive(Clone)]
pub struct FakeConnector {
    pub gateway: FakeGateway,
    reject: Arc<AtomicBool>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self {
            gateway: FakeGateway::new(),
            reject: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn reject_next(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletConnector for FakeConnector {
    type Gateway = FakeGateway;

    async fn connect(&self) -> Result<Connection<FakeGateway>> {
        if self.reject.swap(false, Ordering::SeqCst) {
            bail!("user rejected the request");
        }
        Ok(Connection {
            account: TEST_ACCOUNT,
            gateway: self.gateway.clone(),
        })
    }
}
