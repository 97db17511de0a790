//! Serializable operations
//!
//! [`Operation`] names every mutating entry point of [`Token`] so that calls
//! can be read from files and replayed with [`Token::execute`].

use crate::config::amount_string;
use crate::token::{Token, TransferReceipt};
use crate::types::{Address, Amount};
use crate::Result;
use serde::{Deserialize, Serialize};

/// A mutating call, minus the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// `transfer(to, amount)`
    Transfer {
        /// Recipient
        to: Address,
        /// Gross amount
        #[serde(with = "amount_string")]
        amount: Amount,
    },
    /// `approve(spender, amount)`
    Approve {
        /// Spender
        spender: Address,
        /// New allowance
        #[serde(with = "amount_string")]
        amount: Amount,
    },
    /// `transfer_from(from, to, amount)`
    TransferFrom {
        /// Holder
        from: Address,
        /// Recipient
        to: Address,
        /// Gross amount
        #[serde(with = "amount_string")]
        amount: Amount,
    },
    /// `pause()`
    Pause,
    /// `unpause()`
    Unpause,
    /// `transfer_ownership(new_owner)`
    TransferOwnership {
        /// New owner
        new_owner: Address,
    },
    /// `renounce_ownership()`
    RenounceOwnership,
    /// `set_uniswap_pair(pair)`
    SetUniswapPair {
        /// Pair address
        pair: Address,
    },
    /// `exclude_from_fees(account, excluded)`
    ExcludeFromFees {
        /// Account
        account: Address,
        /// Flag
        excluded: bool,
    },
    /// `exclude_from_reward(account)`
    ExcludeFromReward {
        /// Account
        account: Address,
    },
    /// `include_in_reward(account)`
    IncludeInReward {
        /// Account
        account: Address,
    },
    /// `update_treasury_wallet(wallet)`
    UpdateTreasuryWallet {
        /// New wallet
        wallet: Address,
    },
    /// `update_lp_wallet(wallet)`
    UpdateLpWallet {
        /// New wallet
        wallet: Address,
    },
    /// `update_tithing_wallet(wallet)`
    UpdateTithingWallet {
        /// New wallet
        wallet: Address,
    },
    /// `set_max_transaction_amount(amount)`
    SetMaxTransactionAmount {
        /// New cap
        #[serde(with = "amount_string")]
        amount: Amount,
    },
}

impl Operation {
    /// Method name, as used in logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Transfer { .. } => "transfer",
            Operation::Approve { .. } => "approve",
            Operation::TransferFrom { .. } => "transfer_from",
            Operation::Pause => "pause",
            Operation::Unpause => "unpause",
            Operation::TransferOwnership { .. } => "transfer_ownership",
            Operation::RenounceOwnership => "renounce_ownership",
            Operation::SetUniswapPair { .. } => "set_uniswap_pair",
            Operation::ExcludeFromFees { .. } => "exclude_from_fees",
            Operation::ExcludeFromReward { .. } => "exclude_from_reward",
            Operation::IncludeInReward { .. } => "include_in_reward",
            Operation::UpdateTreasuryWallet { .. } => "update_treasury_wallet",
            Operation::UpdateLpWallet { .. } => "update_lp_wallet",
            Operation::UpdateTithingWallet { .. } => "update_tithing_wallet",
            Operation::SetMaxTransactionAmount { .. } => "set_max_transaction_amount",
        }
    }
}

/// What a successful operation produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Value moved
    Transferred(TransferReceipt),
    /// State updated, nothing to report
    Applied,
}

impl Token {
    /// Apply `operation` on behalf of `caller`
    pub fn execute(&mut self, caller: Address, operation: &Operation) -> Result<Outcome> {
        let outcome = match *operation {
            Operation::Transfer { to, amount } => Outcome::Transferred(self.transfer(caller, to, amount)?),
            Operation::Approve { spender, amount } => {
                self.approve(caller, spender, amount)?;
                Outcome::Applied
            }
            Operation::TransferFrom { from, to, amount } => {
                Outcome::Transferred(self.transfer_from(caller, from, to, amount)?)
            }
            Operation::Pause => {
                self.pause(caller)?;
                Outcome::Applied
            }
            Operation::Unpause => {
                self.unpause(caller)?;
                Outcome::Applied
            }
            Operation::TransferOwnership { new_owner } => {
                self.transfer_ownership(caller, new_owner)?;
                Outcome::Applied
            }
            Operation::RenounceOwnership => {
                self.renounce_ownership(caller)?;
                Outcome::Applied
            }
            Operation::SetUniswapPair { pair } => {
                self.set_uniswap_pair(caller, pair)?;
                Outcome::Applied
            }
            Operation::ExcludeFromFees { account, excluded } => {
                self.exclude_from_fees(caller, account, excluded)?;
                Outcome::Applied
            }
            Operation::ExcludeFromReward { account } => {
                self.exclude_from_reward(caller, account)?;
                Outcome::Applied
            }
            Operation::IncludeInReward { account } => {
                self.include_in_reward(caller, account)?;
                Outcome::Applied
            }
            Operation::UpdateTreasuryWallet { wallet } => {
                self.update_treasury_wallet(caller, wallet)?;
                Outcome::Applied
            }
            Operation::UpdateLpWallet { wallet } => {
                self.update_lp_wallet(caller, wallet)?;
                Outcome::Applied
            }
            Operation::UpdateTithingWallet { wallet } => {
                self.update_tithing_wallet(caller, wallet)?;
                Outcome::Applied
            }
            Operation::SetMaxTransactionAmount { amount } => {
                self.set_max_transaction_amount(caller, amount)?;
                Outcome::Applied
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use crate::types::Wallets;
    use crate::Error;

    const OWNER: Address = Address::repeat_byte(0x01);
    const ALICE: Address = Address::repeat_byte(0xa1);

    fn token() -> Token {
        let wallets = Wallets {
            treasury: Address::repeat_byte(0x11),
            lp: Address::repeat_byte(0x12),
            tithing: Address::repeat_byte(0x13),
        };
        Token::deploy(OWNER, wallets, &TokenConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_operation_from_toml() {
        let op: Operation = toml::from_str(&format!(
            "op = \"transfer\"\nto = \"{}\"\namount = \"10_000\"",
            ALICE
        ))
        .unwrap();
        assert_eq!(op, Operation::Transfer { to: ALICE, amount: 10_000 });
        assert_eq!(op.name(), "transfer");

        let op: Operation = toml::from_str("op = \"pause\"").unwrap();
        assert_eq!(op, Operation::Pause);
    }

    #[test]
    fn test_execute_dispatches() {
        let mut token = token();

        let outcome = token
            .execute(OWNER, &Operation::Transfer { to: ALICE, amount: 50 })
            .unwrap();
        assert!(matches!(outcome, Outcome::Transferred(r) if r.assessment.net == 50));

        token
            .execute(OWNER, &Operation::SetMaxTransactionAmount { amount: 7 })
            .unwrap();
        assert_eq!(token.max_transaction_amount(), 7);

        assert!(matches!(
            token.execute(ALICE, &Operation::Unpause),
            Err(Error::Unauthorized { .. })
        ));
    }
}
