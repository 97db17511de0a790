//! Tax computation and beneficiary split
//!
//! # Rule
//!
//! 1. Either party fee-exempt: no tax
//! 2. Otherwise pick the buy, sell or transfer rate from the pair classification
//! 3. `tax = floor(amount * rate / 10_000)`, `net = amount - tax`
//!
//! The split gives LP and tithing their floored shares and the treasury
//! whatever is left, so `treasury + lp + tithing == tax` exactly.

use crate::config::{TaxConfig, MAX_BPS};
use crate::registry::{ExemptionRegistry, PairRegistry};
use crate::types::{Address, Amount, TransferKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Outcome of taxing one transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAssessment {
    /// Buy / sell / transfer
    pub kind: TransferKind,
    /// Rate applied (0 when exempt)
    pub rate_bps: u16,
    /// Gross amount debited from the sender
    pub amount: Amount,
    /// Total withheld
    pub tax: Amount,
    /// Amount credited to the recipient
    pub net: Amount,
    /// Per-wallet shares of `tax`
    pub split: TaxSplit,
}

impl TaxAssessment {
    /// True if nothing was withheld
    pub fn is_untaxed(&self) -> bool {
        self.tax == 0
    }
}

/// Tax shares per beneficiary wallet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSplit {
    /// Treasury share, including the rounding remainder
    pub treasury: Amount,
    /// LP share
    pub lp: Amount,
    /// Tithing share
    pub tithing: Amount,
}

impl TaxSplit {
    /// Sum of all shares
    pub fn total(&self) -> Option<Amount> {
        self.treasury.checked_add(self.lp)?.checked_add(self.tithing)
    }
}

/// Tax policy engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEngine {
    config: TaxConfig,
}

impl TaxEngine {
    /// Build from a validated policy
    pub fn new(config: TaxConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active policy
    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    /// Rate for a transfer direction
    pub fn rate_for(&self, kind: TransferKind) -> u16 {
        match kind {
            TransferKind::Buy => self.config.buy_tax_bps,
            TransferKind::Sell => self.config.sell_tax_bps,
            TransferKind::Transfer => self.config.transfer_tax_bps,
        }
    }

    /// Compute `(tax, net)` and the split for a transfer
    pub fn assess(
        &self,
        pairs: &PairRegistry,
        exemptions: &ExemptionRegistry,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<TaxAssessment> {
        let kind = pairs.classify(from, to);

        if exemptions.either_fee_exempt(from, to) {
            return Ok(TaxAssessment {
                kind,
                rate_bps: 0,
                amount,
                tax: 0,
                net: amount,
                split: TaxSplit::default(),
            });
        }

        let rate_bps = self.rate_for(kind);
        let tax = mul_bps(amount, rate_bps);
        let net = amount.checked_sub(tax).ok_or(Error::Overflow)?;
        let split = self.split(tax)?;

        Ok(TaxAssessment {
            kind,
            rate_bps,
            amount,
            tax,
            net,
            split,
        })
    }

    /// Divide `tax` across the wallets; treasury absorbs the remainder
    pub fn split(&self, tax: Amount) -> Result<TaxSplit> {
        let lp = mul_bps(tax, self.config.lp_share_bps);
        let tithing = mul_bps(tax, self.config.tithing_share_bps);
        let treasury = tax
            .checked_sub(lp)
            .and_then(|rest| rest.checked_sub(tithing))
            .ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "tax split exceeds tax: lp {} + tithing {} > {}",
                    lp, tithing, tax
                ))
            })?;

        Ok(TaxSplit {
            treasury,
            lp,
            tithing,
        })
    }
}

/// `floor(amount * bps / 10_000)` without overflowing for any `u128` amount
pub fn mul_bps(amount: Amount, bps: u16) -> Amount {
    let denominator = MAX_BPS as Amount;
    let bps = bps as Amount;
    (amount / denominator) * bps + (amount % denominator) * bps / denominator
}
