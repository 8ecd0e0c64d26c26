// src/view.rs
use ethers::types::Address;
use serde::Serialize;

/// Presentation state published to the form controls. Figures are display-ready decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub account: Option<Address>,
    pub user_tokens: Vec<Address>,
    pub user_token_count: String,
    pub selected_token: Option<Address>,
    pub token_symbol: Option<String>,
    pub token_owner: Option<Address>,
    pub user_balance: String,
    pub reserve_balance: String,
    pub last_update: String,
    pub contract_paused: bool,
    pub contract_owner: Option<Address>,
    pub stake: String,
    pub total_staked: String,
    pub rewards_pool: String,
    pub pending_rewards: String,
    pub min_stake: String,
    pub busy: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        let zero = || "0".to_string();
        Self {
            account: None,
            user_tokens: Vec::new(),
            user_token_count: zero(),
            selected_token: None,
            token_symbol: None,
            token_owner: None,
            user_balance: zero(),
            reserve_balance: zero(),
            last_update: "never".to_string(),
            contract_paused: false,
            contract_owner: None,
            stake: zero(),
            total_staked: zero(),
            rewards_pool: zero(),
            pending_rewards: zero(),
            min_stake: zero(),
            busy: false,
        }
    }
}

impl ViewState {
    pub fn owns_token(&self, token: &Address) -> bool {
        self.user_tokens.contains(token)
    }
}

/// Figures that depend on the selected token and the connected account.
#[derive(Debug, Clone)]
pub struct TokenFigures {
    pub symbol: String,
    pub user_balance: String,
    pub stake: String,
    pub total_staked: String,
    pub rewards_pool: String,
    pub pending_rewards: String,
    pub min_stake: String,
}

impl TokenFigures {
    pub fn apply(self, view: &mut ViewState) {
        view.token_symbol = Some(self.symbol);
        view.user_balance = self.user_balance;
        view.stake = self.stake;
        view.total_staked = self.total_staked;
        view.rewards_pool = self.rewards_pool;
        view.pending_rewards = self.pending_rewards;
        view.min_stake = self.min_stake;
    }
}
