// src/config.rs
use anyhow::{Context, Result, bail};
use ethers::types::{Address, U256};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_GAS_LIMIT: u64 = 3_000_000;

/// Fixed deployments the dashboard talks to. Token contracts are bound per handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ContractAddresses {
    pub factory: Address,
    pub reserve: Address,
    pub avs: Address,
}

#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    pub private_key: Option<String>,
    pub bind_addr: SocketAddr,
    pub gas_limit: U256,
    pub contracts: ContractAddresses,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let rpc_url = env::var("RPC_URL").context("RPC_URL must be set")?;

        let private_key = env::var("PRIVATE_KEY").ok().filter(|key| !key.trim().is_empty());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a socket address")?;

        let gas_limit = match env::var("GAS_LIMIT") {
            Ok(raw) => raw.parse::<u64>().context("GAS_LIMIT is not an integer")?,
            Err(_) => DEFAULT_GAS_LIMIT,
        };

        let contracts = read_contract_addresses()?;
        validate_contract_addresses(&contracts)?;

        Ok(Self {
            rpc_url,
            private_key,
            bind_addr,
            gas_limit: U256::from(gas_limit),
            contracts,
        })
    }
}

pub fn read_contract_addresses() -> Result<ContractAddresses> {
    let content = include_str!("../config/contracts.json");
    serde_json::from_str(content).context("Failed to parse contract address list")
}

pub fn validate_contract_addresses(contracts: &ContractAddresses) -> Result<()> {
    let named = [
        ("factory", contracts.factory),
        ("reserve", contracts.reserve),
        ("avs", contracts.avs),
    ];

    for (name, address) in &named {
        if address.is_zero() {
            bail!("contract address for '{}' is the zero address", name);
        }
    }

    let mut duplicates = Vec::new();
    for (i, (name, address)) in named.iter().enumerate() {
        for (other, other_address) in &named[i + 1..] {
            if address == other_address {
                duplicates.push(format!("{} and {} share 0x{:x}", name, other, address));
            }
        }
    }

    if !duplicates.is_empty() {
        bail!(
            "config/contracts.json lists the same deployment twice:\n{}",
            duplicates.join("\n")
        );
    }

    Ok(())
}
