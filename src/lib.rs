// src/lib.rs
#![allow(clippy::module_inception)]

use ethers::contract::abigen;

abigen!(TokenFactory, r#"[
    function createToken(string name, string symbol, address tokenOwner) public returns (address)
    function getTokensByUser(address user) public view returns (address[])
    function addToAVSTokens(address token) public
    function removeFromAVSTokens(address token) public
    function getUserTokenCount(address user) public view returns (uint256)
]"#);

abigen!(Token, r#"[
    function mint(address to, uint256 amount) public
    function burn(uint256 amount) public
    function balanceOf(address account) public view returns (uint256)
    function symbol() public view returns (string)
    function approve(address spender, uint256 amount) public returns (bool)
    function transferOwnership(address newOwner) public
    function owner() public view returns (address)
]"#);

abigen!(Reserve, r#"[
    function setReserveBalance(address tokenAddress, uint256 newBalance) external
    function getReserveBalance(address tokenAddress) external view returns (uint256)
    function getLastUpdateTimestamp() external view returns (uint256)
]"#);

abigen!(VeristableAvs, r#"[
    function stakeForToken(address token) external payable
    function unstakeFromToken(address token, uint256 amount) external
    function claimTokenRewards(address token) external
    function distributeTokenRewards(address token) external payable
    function pause() external
    function unpause() external
    function transferOwnership(address newOwner) external
    function paused() external view returns (bool)
    function owner() external view returns (address)
    function tokenStakes(address token, address staker) external view returns (uint256)
    function totalTokenStakes(address token) external view returns (uint256)
    function tokenRewardsPools(address token) external view returns (uint256)
    function pendingTokenRewards(address token, address staker) external view returns (uint256)
    function MIN_TOKEN_STAKE() external view returns (uint256)
]"#);

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod utils;
pub mod view;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;
