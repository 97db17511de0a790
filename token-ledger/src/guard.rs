//! Per-transaction transfer cap

use crate::registry::ExemptionRegistry;
use crate::types::{Address, Amount};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Maximum transfer amount for non-exempt parties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionGuard {
    max_transaction_amount: Amount,
}

impl TransactionGuard {
    /// Guard with the given cap
    pub fn new(max_transaction_amount: Amount) -> Self {
        Self {
            max_transaction_amount,
        }
    }

    /// Current cap
    pub fn max_transaction_amount(&self) -> Amount {
        self.max_transaction_amount
    }

    /// Reject `amount` above the cap unless either party is fee-exempt
    pub fn check_amount(
        &self,
        exemptions: &ExemptionRegistry,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        if amount > self.max_transaction_amount && !exemptions.either_fee_exempt(from, to) {
            return Err(Error::MaxTransactionExceeded {
                amount,
                max: self.max_transaction_amount,
            });
        }
        Ok(())
    }

    /// Replace the cap, returning the previous one
    pub fn set_max_transaction_amount(&mut self, amount: Amount) -> Amount {
        std::mem::replace(&mut self.max_transaction_amount, amount)
    }
}
