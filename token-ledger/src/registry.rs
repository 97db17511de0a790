//! Per-address exemption flags and the liquidity pair identity

use crate::types::{Address, TransferKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fee and reward exemption sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionRegistry {
    fee_exempt: BTreeSet<Address>,
    reward_exempt: BTreeSet<Address>,
}

impl ExemptionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear fee exemption. Returns whether membership changed.
    pub fn set_fee_exempt(&mut self, account: Address, excluded: bool) -> bool {
        if excluded {
            self.fee_exempt.insert(account)
        } else {
            self.fee_exempt.remove(&account)
        }
    }

    /// Set or clear reward exemption. Returns whether membership changed.
    pub fn set_reward_exempt(&mut self, account: Address, excluded: bool) -> bool {
        if excluded {
            self.reward_exempt.insert(account)
        } else {
            self.reward_exempt.remove(&account)
        }
    }

    /// Check fee exemption
    pub fn is_fee_exempt(&self, account: &Address) -> bool {
        self.fee_exempt.contains(account)
    }

    /// True if either side of a transfer is fee-exempt
    pub fn either_fee_exempt(&self, from: &Address, to: &Address) -> bool {
        self.is_fee_exempt(from) || self.is_fee_exempt(to)
    }

    /// Check reward exemption
    pub fn is_reward_exempt(&self, account: &Address) -> bool {
        self.reward_exempt.contains(account)
    }
}

/// The designated liquidity pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRegistry {
    pair: Address,
}

impl PairRegistry {
    /// No pair set
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pair (zero if unset)
    pub fn pair(&self) -> Address {
        self.pair
    }

    /// Whether a pair has been designated
    pub fn is_set(&self) -> bool {
        !self.pair.is_zero()
    }

    /// Replace the pair, returning the previous one
    pub fn set(&mut self, pair: Address) -> Result<Address> {
        if pair.is_zero() {
            return Err(Error::InvalidAddress("uniswap pair"));
        }
        Ok(std::mem::replace(&mut self.pair, pair))
    }

    /// Sell if tokens enter the pair, buy if they leave it
    pub fn classify(&self, from: &Address, to: &Address) -> TransferKind {
        if !self.is_set() {
            TransferKind::Transfer
        } else if *to == self.pair {
            TransferKind::Sell
        } else if *from == self.pair {
            TransferKind::Buy
        } else {
            TransferKind::Transfer
        }
    }
}
