//! The deployed token
//!
//! [`Token`] owns every component and is the only way to change state.
//! Each mutating method takes the caller explicitly and runs all of its
//! checks before the first write, so an `Err` never leaves partial effects.
//!
//! # Transfer pipeline
//!
//! ```text
//! AccessControl::ensure_not_paused
//!         │
//!         ▼
//! zero-address checks
//!         │
//!         ▼
//! TransactionGuard::check_amount ── exempt parties skip the cap
//!         │
//!         ▼
//! TaxEngine::assess ── PairRegistry::classify + ExemptionRegistry
//!         │
//!         ▼
//! Ledger::apply(Journal) ── debit sender, credit net + three shares
//! ```

use crate::{
    access::AccessControl,
    config::TokenConfig,
    guard::TransactionGuard,
    ledger::{Journal, Ledger},
    metrics::Metrics,
    registry::{ExemptionRegistry, PairRegistry},
    tax::{TaxAssessment, TaxEngine},
    types::{Address, Amount, EventRecord, TokenEvent, WalletRole, Wallets},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Token name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Display decimals
    pub decimals: u8,
}

/// Result of a successful transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Debited account
    pub from: Address,
    /// Credited account
    pub to: Address,
    /// Tax outcome, including the net amount credited to `to`
    pub assessment: TaxAssessment,
}

/// Fee-on-transfer token ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    metadata: Metadata,
    ledger: Ledger,
    access: AccessControl,
    exemptions: ExemptionRegistry,
    pairs: PairRegistry,
    wallets: Wallets,
    tax: TaxEngine,
    guard: TransactionGuard,
    allowances: BTreeMap<(Address, Address), Amount>,
    events: Vec<EventRecord>,

    #[serde(skip)]
    metrics: Option<Metrics>,
}

impl Token {
    /// Deploy: mint the whole supply to `deployer`, who becomes owner.
    ///
    /// The deployer and the three wallets start fee-exempt.
    pub fn deploy(deployer: Address, wallets: Wallets, config: &TokenConfig) -> Result<Self> {
        if deployer.is_zero() {
            return Err(Error::InvalidAddress("deployer"));
        }
        wallets.validate()?;

        let tax = TaxEngine::new(config.tax)?;
        let ledger = Ledger::genesis(deployer, config.total_supply)?;

        let mut exemptions = ExemptionRegistry::new();
        for account in [deployer, wallets.treasury, wallets.lp, wallets.tithing] {
            exemptions.set_fee_exempt(account, true);
        }

        let mut token = Self {
            metadata: Metadata {
                name: config.name.clone(),
                symbol: config.symbol.clone(),
                decimals: config.decimals,
            },
            ledger,
            access: AccessControl::new(deployer),
            exemptions,
            pairs: PairRegistry::new(),
            wallets,
            tax,
            guard: TransactionGuard::new(config.max_transaction_amount),
            allowances: BTreeMap::new(),
            events: Vec::new(),
            metrics: None,
        };

        token.emit(TokenEvent::OwnershipTransferred {
            previous: Address::ZERO,
            new: deployer,
        });
        token.emit(TokenEvent::Transfer {
            from: Address::ZERO,
            to: deployer,
            amount: config.total_supply,
        });

        info!(
            symbol = %token.metadata.symbol,
            owner = %deployer,
            total_supply = %config.total_supply,
            treasury = %wallets.treasury,
            lp = %wallets.lp,
            tithing = %wallets.tithing,
            "Token deployed"
        );

        Ok(token)
    }

    /// Attach a metrics collector. Events already in the log (the deployment
    /// events) are counted on attach.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        metrics.record_events(self.events.len());
        self.metrics = Some(metrics);
        self
    }

    /// Attached metrics collector, if any
    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Token name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Ticker symbol
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Display decimals
    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Fixed total supply
    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    /// Balance of `account`
    pub fn balance_of(&self, account: Address) -> Amount {
        self.ledger.balance_of(&account)
    }

    /// Accounts with a non-zero balance
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.ledger.balances()
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Whether transfers are halted
    pub fn is_paused(&self) -> bool {
        self.access.is_paused()
    }

    /// Treasury wallet
    pub fn treasury_wallet(&self) -> Address {
        self.wallets.treasury
    }

    /// LP wallet
    pub fn lp_wallet(&self) -> Address {
        self.wallets.lp
    }

    /// Tithing wallet
    pub fn tithing_wallet(&self) -> Address {
        self.wallets.tithing
    }

    /// All three wallets
    pub fn wallets(&self) -> Wallets {
        self.wallets
    }

    /// Liquidity pair (zero if unset)
    pub fn uniswap_pair(&self) -> Address {
        self.pairs.pair()
    }

    /// Transaction cap for non-exempt transfers
    pub fn max_transaction_amount(&self) -> Amount {
        self.guard.max_transaction_amount()
    }

    /// Fee exemption flag
    pub fn is_excluded_from_fees(&self, account: Address) -> bool {
        self.exemptions.is_fee_exempt(&account)
    }

    /// Reward exemption flag
    pub fn is_excluded_from_reward(&self, account: Address) -> bool {
        self.exemptions.is_reward_exempt(&account)
    }

    /// Remaining allowance of `spender` over `holder`'s balance
    pub fn allowance(&self, holder: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(holder, spender))
            .copied()
            .unwrap_or(0)
    }

    /// Tax that a transfer would pay right now, without moving anything
    pub fn preview_tax(&self, from: Address, to: Address, amount: Amount) -> Result<TaxAssessment> {
        self.tax.assess(&self.pairs, &self.exemptions, &from, &to, amount)
    }

    /// Full event log
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Events with `sequence >= from_sequence`
    pub fn events_since(&self, from_sequence: u64) -> &[EventRecord] {
        let start = self
            .events
            .partition_point(|record| record.sequence < from_sequence);
        &self.events[start..]
    }

    /// Re-check every structural invariant (used after restoring a snapshot)
    pub fn check_invariants(&self) -> Result<()> {
        self.ledger.check_conservation()?;
        self.tax.config().validate()?;
        self.wallets.validate()?;

        let in_order = self
            .events
            .iter()
            .enumerate()
            .all(|(i, record)| record.sequence == i as u64);
        if !in_order {
            return Err(Error::InvariantViolation(
                "event sequence numbers are not contiguous".to_string(),
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Value movement
    // ------------------------------------------------------------------

    /// Move `amount` from `caller` to `to`, withholding tax.
    ///
    /// `to` receives `receipt.assessment.net`, which is less than `amount`
    /// whenever tax applies.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> Result<TransferReceipt> {
        let result = self.move_tokens(caller, to, amount);
        self.observe("transfer", result)
    }

    /// Set `spender`'s allowance over `caller`'s balance
    pub fn approve(&mut self, caller: Address, spender: Address, amount: Amount) -> Result<()> {
        let result = self.approve_inner(caller, spender, amount);
        self.observe("approve", result)
    }

    /// Move `amount` from `from` to `to` on `from`'s behalf, spending
    /// `caller`'s allowance. Fails with `EnforcedPause` while paused, before
    /// the allowance is looked at. The allowance is only spent if the
    /// transfer succeeds; an allowance of `Amount::MAX` is never decremented.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<TransferReceipt> {
        let result = self.transfer_from_inner(caller, from, to, amount);
        self.observe("transfer_from", result)
    }

    fn approve_inner(&mut self, caller: Address, spender: Address, amount: Amount) -> Result<()> {
        if caller.is_zero() {
            return Err(Error::InvalidAddress("approver"));
        }
        if spender.is_zero() {
            return Err(Error::InvalidAddress("spender"));
        }

        self.allowances.insert((caller, spender), amount);
        self.emit(TokenEvent::Approval {
            holder: caller,
            spender,
            amount,
        });
        debug!(holder = %caller, spender = %spender, amount = %amount, "Allowance set");
        Ok(())
    }

    fn transfer_from_inner(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<TransferReceipt> {
        self.access.ensure_not_paused()?;

        let current = self.allowance(from, caller);
        if current < amount {
            return Err(Error::InsufficientAllowance {
                have: current,
                need: amount,
            });
        }

        let receipt = self.move_tokens(from, to, amount)?;

        if current != Amount::MAX {
            self.allowances.insert((from, caller), current - amount);
        }
        Ok(receipt)
    }

    fn move_tokens(&mut self, from: Address, to: Address, amount: Amount) -> Result<TransferReceipt> {
        self.access.ensure_not_paused()?;

        if from.is_zero() {
            return Err(Error::InvalidSender);
        }
        if to.is_zero() {
            return Err(Error::InvalidRecipient);
        }

        self.guard.check_amount(&self.exemptions, &from, &to, amount)?;
        let assessment = self.tax.assess(&self.pairs, &self.exemptions, &from, &to, amount)?;

        let split = assessment.split;
        let mut journal = Journal::new();
        journal
            .debit(from, amount)
            .credit(to, assessment.net)
            .credit(self.wallets.treasury, split.treasury)
            .credit(self.wallets.lp, split.lp)
            .credit(self.wallets.tithing, split.tithing);

        self.ledger.apply(&journal)?;

        self.emit(TokenEvent::Transfer {
            from,
            to,
            amount: assessment.net,
        });
        if !assessment.is_untaxed() {
            self.emit(TokenEvent::TaxCollected {
                from,
                to,
                kind: assessment.kind,
                tax: assessment.tax,
            });
            for (role, share) in [
                (WalletRole::Treasury, split.treasury),
                (WalletRole::Lp, split.lp),
                (WalletRole::Tithing, split.tithing),
            ] {
                if share > 0 {
                    self.emit(TokenEvent::Transfer {
                        from,
                        to: self.wallets.get(role),
                        amount: share,
                    });
                }
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_transfer(assessment.kind.label(), !assessment.is_untaxed());
        }

        debug!(
            from = %from,
            to = %to,
            kind = %assessment.kind,
            amount = %amount,
            tax = %assessment.tax,
            net = %assessment.net,
            "Transfer applied"
        );

        Ok(TransferReceipt {
            from,
            to,
            assessment,
        })
    }

    // ------------------------------------------------------------------
    // Admin surface (owner only)
    // ------------------------------------------------------------------

    /// Halt all transfers
    pub fn pause(&mut self, caller: Address) -> Result<()> {
        let result = self.access.pause(caller);
        self.observe("pause", result)?;

        self.emit(TokenEvent::Paused { account: caller });
        self.admin_done("pause");
        info!(owner = %caller, "Transfers paused");
        Ok(())
    }

    /// Resume transfers
    pub fn unpause(&mut self, caller: Address) -> Result<()> {
        let result = self.access.unpause(caller);
        self.observe("unpause", result)?;

        self.emit(TokenEvent::Unpaused { account: caller });
        self.admin_done("unpause");
        info!(owner = %caller, "Transfers resumed");
        Ok(())
    }

    /// Hand ownership to `new_owner`
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        let result = self.access.transfer_ownership(caller, new_owner);
        let previous = self.observe("transfer_ownership", result)?;

        self.emit(TokenEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        });
        self.admin_done("transfer_ownership");
        info!(previous = %previous, new = %new_owner, "Ownership transferred");
        Ok(())
    }

    /// Give up ownership; every owner-only call fails afterwards
    pub fn renounce_ownership(&mut self, caller: Address) -> Result<()> {
        let result = self.access.renounce_ownership(caller);
        let previous = self.observe("renounce_ownership", result)?;

        self.emit(TokenEvent::OwnershipTransferred {
            previous,
            new: Address::ZERO,
        });
        self.admin_done("renounce_ownership");
        warn!(previous = %previous, "Ownership renounced");
        Ok(())
    }

    /// Designate the liquidity pair
    pub fn set_uniswap_pair(&mut self, caller: Address, pair: Address) -> Result<()> {
        let result = self
            .access
            .ensure_owner(caller)
            .and_then(|_| self.pairs.set(pair));
        let previous = self.observe("set_uniswap_pair", result)?;

        self.emit(TokenEvent::PairUpdated { previous, new: pair });
        self.admin_done("set_uniswap_pair");
        info!(previous = %previous, pair = %pair, "Liquidity pair updated");
        Ok(())
    }

    /// Set or clear fee exemption (also lifts the transaction cap)
    pub fn exclude_from_fees(&mut self, caller: Address, account: Address, excluded: bool) -> Result<()> {
        let result = self.access.ensure_owner(caller);
        self.observe("exclude_from_fees", result)?;

        self.exemptions.set_fee_exempt(account, excluded);
        self.emit(TokenEvent::FeeExemptionUpdated { account, excluded });
        self.admin_done("exclude_from_fees");
        info!(account = %account, excluded, "Fee exemption updated");
        Ok(())
    }

    /// Exclude `account` from reward accounting
    pub fn exclude_from_reward(&mut self, caller: Address, account: Address) -> Result<()> {
        self.set_reward_exemption(caller, account, true, "exclude_from_reward")
    }

    /// Include `account` in reward accounting again
    pub fn include_in_reward(&mut self, caller: Address, account: Address) -> Result<()> {
        self.set_reward_exemption(caller, account, false, "include_in_reward")
    }

    fn set_reward_exemption(
        &mut self,
        caller: Address,
        account: Address,
        excluded: bool,
        operation: &'static str,
    ) -> Result<()> {
        let result = self.access.ensure_owner(caller);
        self.observe(operation, result)?;

        self.exemptions.set_reward_exempt(account, excluded);
        self.emit(TokenEvent::RewardExemptionUpdated { account, excluded });
        self.admin_done(operation);
        info!(account = %account, excluded, "Reward exemption updated");
        Ok(())
    }

    /// Replace the treasury wallet.
    ///
    /// Fee exemptions are keyed by address, not by role: the retired wallet
    /// keeps any exemption it has and the new one starts without. Use
    /// `exclude_from_fees` to move it.
    pub fn update_treasury_wallet(&mut self, caller: Address, wallet: Address) -> Result<()> {
        self.update_wallet(caller, WalletRole::Treasury, wallet, "update_treasury_wallet")
    }

    /// Replace the LP wallet
    pub fn update_lp_wallet(&mut self, caller: Address, wallet: Address) -> Result<()> {
        self.update_wallet(caller, WalletRole::Lp, wallet, "update_lp_wallet")
    }

    /// Replace the tithing wallet
    pub fn update_tithing_wallet(&mut self, caller: Address, wallet: Address) -> Result<()> {
        self.update_wallet(caller, WalletRole::Tithing, wallet, "update_tithing_wallet")
    }

    fn update_wallet(
        &mut self,
        caller: Address,
        role: WalletRole,
        wallet: Address,
        operation: &'static str,
    ) -> Result<()> {
        let result = self.access.ensure_owner(caller).and_then(|_| {
            if wallet.is_zero() {
                Err(Error::InvalidAddress("wallet"))
            } else {
                Ok(())
            }
        });
        self.observe(operation, result)?;

        let slot = match role {
            WalletRole::Treasury => &mut self.wallets.treasury,
            WalletRole::Lp => &mut self.wallets.lp,
            WalletRole::Tithing => &mut self.wallets.tithing,
        };
        let previous = std::mem::replace(slot, wallet);

        self.emit(TokenEvent::WalletUpdated {
            role,
            previous,
            new: wallet,
        });
        self.admin_done(operation);
        info!(role = %role, previous = %previous, new = %wallet, "Wallet updated");
        Ok(())
    }

    /// Replace the transaction cap
    pub fn set_max_transaction_amount(&mut self, caller: Address, amount: Amount) -> Result<()> {
        let result = self.access.ensure_owner(caller);
        self.observe("set_max_transaction_amount", result)?;

        let previous = self.guard.set_max_transaction_amount(amount);
        self.emit(TokenEvent::MaxTransactionAmountUpdated {
            previous,
            new: amount,
        });
        self.admin_done("set_max_transaction_amount");
        info!(previous = %previous, new = %amount, "Max transaction amount updated");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn emit(&mut self, event: TokenEvent) {
        let sequence = self.events.len() as u64;
        self.events.push(EventRecord { sequence, event });
        if let Some(metrics) = &self.metrics {
            metrics.record_events(1);
        }
    }

    fn admin_done(&self, operation: &'static str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_admin(operation);
        }
    }

    /// Log and count a failed operation; pass successes through
    fn observe<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            match e {
                Error::Unauthorized { caller } => {
                    warn!(operation, caller = %caller, owner = %self.access.owner(), "Rejected non-owner call");
                }
                _ => debug!(operation, error = %e, "Operation rejected"),
            }
            if let Some(metrics) = &self.metrics {
                metrics.record_rejection(e.kind());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferKind;

    const OWNER: Address = Address::repeat_byte(0x01);
    const TREASURY: Address = Address::repeat_byte(0x11);
    const LP: Address = Address::repeat_byte(0x12);
    const TITHING: Address = Address::repeat_byte(0x13);
    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);
    const PAIR: Address = Address::repeat_byte(0xfe);

    fn wallets() -> Wallets {
        Wallets {
            treasury: TREASURY,
            lp: LP,
            tithing: TITHING,
        }
    }

    fn deploy() -> Token {
        Token::deploy(OWNER, wallets(), &TokenConfig::default()).unwrap()
    }

    #[test]
    fn test_deploy() {
        let token = deploy();
        assert_eq!(token.owner(), OWNER);
        assert_eq!(token.balance_of(OWNER), token.total_supply());
        assert_eq!(token.wallets(), wallets());
        assert!(token.uniswap_pair().is_zero());
        assert!(!token.is_paused());
        assert!(token.is_excluded_from_fees(OWNER));
        assert!(token.is_excluded_from_fees(TREASURY));
        assert!(!token.is_excluded_from_fees(ALICE));
        assert_eq!(token.name(), "Victor Voltage");
        assert_eq!(token.symbol(), "VVT");
        assert_eq!(token.decimals(), 18);

        assert_eq!(token.events().len(), 2);
        assert_eq!(
            token.events()[1].event,
            TokenEvent::Transfer {
                from: Address::ZERO,
                to: OWNER,
                amount: token.total_supply()
            }
        );
        assert!(token.check_invariants().is_ok());
    }

    #[test]
    fn test_deploy_rejects_zero_inputs() {
        let config = TokenConfig::default();
        assert!(matches!(
            Token::deploy(Address::ZERO, wallets(), &config),
            Err(Error::InvalidAddress("deployer"))
        ));

        let mut bad = wallets();
        bad.lp = Address::ZERO;
        assert!(matches!(
            Token::deploy(OWNER, bad, &config),
            Err(Error::InvalidAddress("lp wallet"))
        ));
    }

    #[test]
    fn test_taxed_transfer_credits_wallets() {
        let mut token = deploy();
        token.transfer(OWNER, ALICE, 10_000_000).unwrap();

        let receipt = token.transfer(ALICE, BOB, 1_000_000).unwrap();
        assert_eq!(receipt.assessment.kind, TransferKind::Transfer);
        assert_eq!(receipt.assessment.tax, 10_000);

        assert_eq!(token.balance_of(ALICE), 9_000_000);
        assert_eq!(token.balance_of(BOB), 990_000);
        assert_eq!(token.balance_of(TREASURY), 4_000);
        assert_eq!(token.balance_of(LP), 4_000);
        assert_eq!(token.balance_of(TITHING), 2_000);
        assert!(token.check_invariants().is_ok());
    }

    #[test]
    fn test_zero_recipient_rejected() {
        let mut token = deploy();
        assert!(matches!(
            token.transfer(OWNER, Address::ZERO, 1),
            Err(Error::InvalidRecipient)
        ));
    }

    #[test]
    fn test_pause_checked_before_everything_else() {
        let mut token = deploy();
        token.pause(OWNER).unwrap();

        // Would otherwise be InsufficientBalance
        assert!(matches!(token.transfer(ALICE, BOB, 1), Err(Error::EnforcedPause)));
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let mut token = deploy();
        token.transfer(OWNER, ALICE, 1_000_000).unwrap();
        token.approve(ALICE, BOB, 600_000).unwrap();
        assert_eq!(token.allowance(ALICE, BOB), 600_000);

        token.transfer_from(BOB, ALICE, BOB, 500_000).unwrap();
        assert_eq!(token.allowance(ALICE, BOB), 100_000);
        assert_eq!(token.balance_of(BOB), 495_000);

        assert!(matches!(
            token.transfer_from(BOB, ALICE, BOB, 100_001),
            Err(Error::InsufficientAllowance { have: 100_000, need: 100_001 })
        ));
    }

    #[test]
    fn test_failed_transfer_from_keeps_allowance() {
        let mut token = deploy();
        token.approve(ALICE, BOB, 500).unwrap();

        // ALICE holds nothing
        assert!(matches!(
            token.transfer_from(BOB, ALICE, BOB, 500),
            Err(Error::InsufficientBalance { .. })
        ));
        assert_eq!(token.allowance(ALICE, BOB), 500);
    }

    #[test]
    fn test_infinite_allowance_not_decremented() {
        let mut token = deploy();
        token.approve(OWNER, BOB, Amount::MAX).unwrap();
        token.transfer_from(BOB, OWNER, ALICE, 1_000).unwrap();
        assert_eq!(token.allowance(OWNER, BOB), Amount::MAX);
    }

    #[test]
    fn test_approve_rejects_zero_spender() {
        let mut token = deploy();
        assert!(matches!(
            token.approve(OWNER, Address::ZERO, 1),
            Err(Error::InvalidAddress("spender"))
        ));
    }

    #[test]
    fn test_update_wallet_redirects_tax() {
        let mut token = deploy();
        let new_treasury = Address::repeat_byte(0x21);
        token.update_treasury_wallet(OWNER, new_treasury).unwrap();
        assert_eq!(token.treasury_wallet(), new_treasury);

        token.transfer(OWNER, ALICE, 1_000_000).unwrap();
        token.transfer(ALICE, BOB, 1_000_000).unwrap();
        assert_eq!(token.balance_of(new_treasury), 4_000);
        assert_eq!(token.balance_of(TREASURY), 0);

        assert!(matches!(
            token.update_lp_wallet(OWNER, Address::ZERO),
            Err(Error::InvalidAddress(_))
        ));
        assert_eq!(token.lp_wallet(), LP);
    }

    #[test]
    fn test_events_since() {
        let mut token = deploy();
        let mark = token.events().len() as u64;
        token.set_uniswap_pair(OWNER, PAIR).unwrap();

        let recent = token.events_since(mark);
        assert_eq!(recent.len(), 1);
        assert_eq!(
            recent[0].event,
            TokenEvent::PairUpdated {
                previous: Address::ZERO,
                new: PAIR
            }
        );
        assert!(token.events_since(1_000).is_empty());
    }

    #[test]
    fn test_failed_operations_emit_nothing() {
        let mut token = deploy();
        let before = token.events().len();

        assert!(token.transfer(ALICE, BOB, 1).is_err());
        assert!(token.pause(ALICE).is_err());
        assert!(token.set_uniswap_pair(OWNER, Address::ZERO).is_err());

        assert_eq!(token.events().len(), before);
    }

    #[test]
    fn test_metrics_recorded() {
        let mut token = deploy().with_metrics(Metrics::new().unwrap());
        token.transfer(OWNER, ALICE, 1_000_000).unwrap();
        token.transfer(ALICE, BOB, 1_000).unwrap();
        let _ = token.pause(ALICE);
        token.pause(OWNER).unwrap();

        let metrics = token.metrics().unwrap();
        assert_eq!(metrics.transfers_total.with_label_values(&["transfer"]).get(), 2);
        assert_eq!(metrics.taxed_transfers_total.with_label_values(&["transfer"]).get(), 1);
        assert_eq!(metrics.rejected_total.with_label_values(&["unauthorized"]).get(), 1);
        assert_eq!(metrics.admin_operations_total.with_label_values(&["pause"]).get(), 1);
        assert_eq!(metrics.events_total.get(), token.events().len() as u64);
    }

    #[test]
    fn test_attach_counts_deployment_events() {
        let token = deploy().with_metrics(Metrics::new().unwrap());
        assert_eq!(token.metrics().unwrap().events_total.get(), 2);
    }

    #[test]
    fn test_preview_matches_transfer() {
        let mut token = deploy();
        token.set_uniswap_pair(OWNER, PAIR).unwrap();
        token.transfer(OWNER, ALICE, 1_000_000).unwrap();

        let preview = token.preview_tax(ALICE, PAIR, 200_000).unwrap();
        let receipt = token.transfer(ALICE, PAIR, 200_000).unwrap();
        assert_eq!(preview, receipt.assessment);
        assert_eq!(preview.kind, TransferKind::Sell);
    }
}
