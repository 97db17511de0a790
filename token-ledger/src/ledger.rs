//! Balance bookkeeping
//!
//! Value moves only through a [`Journal`]: a balanced list of debit and
//! credit postings applied as one unit. Every posting is staged against a
//! scratch copy of the touched balances first; the live map is written only
//! after the whole journal has been validated.
//!
//! # Invariants
//!
//! - Conservation: Σ(balances) == total_supply after every `apply`
//! - Balanced journals: Σ(debits) == Σ(credits)
//! - All-or-nothing: a rejected journal leaves every balance untouched

use crate::types::{Address, Amount};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Decrease balance
    Debit,
    /// Increase balance
    Credit,
}

/// One balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Account touched
    pub account: Address,
    /// Debit or credit
    pub side: Side,
    /// Amount moved
    pub amount: Amount,
}

/// Ordered set of postings applied atomically
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    postings: Vec<Posting>,
}

impl Journal {
    /// Empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a debit
    pub fn debit(&mut self, account: Address, amount: Amount) -> &mut Self {
        self.postings.push(Posting {
            account,
            side: Side::Debit,
            amount,
        });
        self
    }

    /// Add a credit. Zero credits are dropped.
    pub fn credit(&mut self, account: Address, amount: Amount) -> &mut Self {
        if amount > 0 {
            self.postings.push(Posting {
                account,
                side: Side::Credit,
                amount,
            });
        }
        self
    }

    /// Postings in application order
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    fn total(&self, side: Side) -> Result<Amount> {
        self.postings
            .iter()
            .filter(|p| p.side == side)
            .try_fold(0 as Amount, |acc, p| acc.checked_add(p.amount))
            .ok_or(Error::Overflow)
    }

    /// Check Σ(debits) == Σ(credits)
    pub fn ensure_balanced(&self) -> Result<()> {
        let debits = self.total(Side::Debit)?;
        let credits = self.total(Side::Credit)?;
        if debits != credits {
            return Err(Error::InvariantViolation(format!(
                "unbalanced journal: debits {} != credits {}",
                debits, credits
            )));
        }
        Ok(())
    }
}

/// Balances and total supply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balances: BTreeMap<Address, Amount>,
    total_supply: Amount,
}

impl Ledger {
    /// Ledger with the entire supply held by `holder`
    pub fn genesis(holder: Address, total_supply: Amount) -> Result<Self> {
        if holder.is_zero() {
            return Err(Error::InvalidAddress("genesis holder"));
        }

        let mut balances = BTreeMap::new();
        if total_supply > 0 {
            balances.insert(holder, total_supply);
        }

        Ok(Self {
            balances,
            total_supply,
        })
    }

    /// Balance of `account` (zero if never credited)
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Fixed total supply
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Accounts with a non-zero balance, in address order
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Number of accounts with a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Apply a journal atomically
    pub fn apply(&mut self, journal: &Journal) -> Result<()> {
        journal.ensure_balanced()?;

        let mut staged: BTreeMap<Address, Amount> = BTreeMap::new();
        for posting in journal.postings() {
            let current = staged
                .get(&posting.account)
                .copied()
                .unwrap_or_else(|| self.balance_of(&posting.account));

            let next = match posting.side {
                Side::Debit => current.checked_sub(posting.amount).ok_or(
                    Error::InsufficientBalance {
                        have: current,
                        need: posting.amount,
                    },
                )?,
                Side::Credit => current.checked_add(posting.amount).ok_or(Error::Overflow)?,
            };
            staged.insert(posting.account, next);
        }

        for (account, balance) in staged {
            if balance == 0 {
                self.balances.remove(&account);
            } else {
                self.balances.insert(account, balance);
            }
        }

        Ok(())
    }

    /// Verify Σ(balances) == total_supply
    pub fn check_conservation(&self) -> Result<()> {
        let sum = self
            .balances
            .values()
            .try_fold(0 as Amount, |acc, b| acc.checked_add(*b))
            .ok_or(Error::Overflow)?;

        if sum != self.total_supply {
            return Err(Error::InvariantViolation(format!(
                "sum of balances {} != total supply {}",
                sum, self.total_supply
            )));
        }
        Ok(())
    }
}
