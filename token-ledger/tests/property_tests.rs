//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Conservation: Σ(balances) == total_supply after any call sequence
//! - Exact split: wallet shares always sum to the tax
//! - Exemption: exempt transfers credit the full amount
//! - Strictness: taxed transfers credit strictly less than sent
//! - Atomicity: failed calls change nothing

use proptest::prelude::*;
use token_ledger::{
    tax::mul_bps, Address, Amount, Operation, TaxConfig, Token, TokenConfig, Wallets,
};

const OWNER: Address = Address::repeat_byte(0x01);
const PAIR: Address = Address::repeat_byte(0xfe);

fn wallets() -> Wallets {
    Wallets {
        treasury: Address::repeat_byte(0x11),
        lp: Address::repeat_byte(0x12),
        tithing: Address::repeat_byte(0x13),
    }
}

fn small_config() -> TokenConfig {
    TokenConfig {
        total_supply: 1_000_000_000,
        max_transaction_amount: 50_000_000,
        ..TokenConfig::default()
    }
}

/// Strategy for generating callers: owner, pair, wallets and a few users
fn address_strategy() -> impl Strategy<Value = Address> {
    prop_oneof![
        Just(OWNER),
        Just(PAIR),
        Just(Address::repeat_byte(0x11)),
        (0xa0u8..0xa6).prop_map(Address::repeat_byte),
    ]
}

/// Strategy for generating tax policies with a valid split
fn tax_strategy() -> impl Strategy<Value = TaxConfig> {
    (0u16..=10_000, 0u16..=10_000, 0u16..=10_000, 0u16..=10_000, 0u16..=10_000).prop_map(
        |(buy, sell, transfer, a, b)| {
            let lp = a.min(b);
            let tithing = a.max(b) - lp;
            TaxConfig {
                buy_tax_bps: buy,
                sell_tax_bps: sell,
                transfer_tax_bps: transfer,
                treasury_share_bps: 10_000 - lp - tithing,
                lp_share_bps: lp,
                tithing_share_bps: tithing,
            }
        },
    )
}

/// Strategy for generating operations
fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        6 => (address_strategy(), 0u128..100_000_000)
            .prop_map(|(to, amount)| Operation::Transfer { to, amount }),
        2 => (address_strategy(), 0u128..10_000_000)
            .prop_map(|(spender, amount)| Operation::Approve { spender, amount }),
        2 => (address_strategy(), address_strategy(), 0u128..10_000_000)
            .prop_map(|(from, to, amount)| Operation::TransferFrom { from, to, amount }),
        1 => Just(Operation::Pause),
        1 => Just(Operation::Unpause),
        1 => Just(Operation::SetUniswapPair { pair: PAIR }),
        1 => (address_strategy(), any::<bool>())
            .prop_map(|(account, excluded)| Operation::ExcludeFromFees { account, excluded }),
        1 => address_strategy().prop_map(|account| Operation::ExcludeFromReward { account }),
        1 => (0u128..100_000_000)
            .prop_map(|amount| Operation::SetMaxTransactionAmount { amount }),
    ]
}

fn sum_of_balances(token: &Token) -> Amount {
    token.holders().map(|(_, balance)| *balance).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: supply is conserved across arbitrary call sequences
    #[test]
    fn prop_conservation(
        tax in tax_strategy(),
        steps in prop::collection::vec((address_strategy(), operation_strategy()), 1..60),
    ) {
        let config = TokenConfig { tax, ..small_config() };
        let mut token = Token::deploy(OWNER, wallets(), &config).unwrap();

        for (caller, operation) in &steps {
            let _ = token.execute(*caller, operation);
            prop_assert_eq!(sum_of_balances(&token), token.total_supply());
        }
        prop_assert!(token.check_invariants().is_ok());
    }

    /// Property: failed calls leave balances, allowances and the log untouched
    #[test]
    fn prop_failures_are_atomic(
        steps in prop::collection::vec((address_strategy(), operation_strategy()), 1..60),
    ) {
        let mut token = Token::deploy(OWNER, wallets(), &small_config()).unwrap();

        for (caller, operation) in &steps {
            let before = token.clone();
            if token.execute(*caller, operation).is_err() {
                prop_assert_eq!(token.events(), before.events());
                prop_assert_eq!(token.owner(), before.owner());
                prop_assert_eq!(token.is_paused(), before.is_paused());
                let balances: Vec<_> = token.holders().collect();
                let previous: Vec<_> = before.holders().collect();
                prop_assert_eq!(balances, previous);
            }
        }
    }

    /// Property: wallet shares always sum to the tax and net + tax == amount
    #[test]
    fn prop_split_is_exact(tax in tax_strategy(), amount in 0u128..1_000_000_000) {
        let config = TokenConfig { tax, max_transaction_amount: u128::MAX, ..small_config() };
        let token = Token::deploy(OWNER, wallets(), &config).unwrap();
        let sender = Address::repeat_byte(0xa0);
        let recipient = Address::repeat_byte(0xa1);

        let assessment = token.preview_tax(sender, recipient, amount).unwrap();
        prop_assert_eq!(assessment.net + assessment.tax, amount);
        prop_assert_eq!(assessment.split.total(), Some(assessment.tax));
        prop_assert_eq!(assessment.tax, mul_bps(amount, tax.transfer_tax_bps));
    }

    /// Property: exempt recipients receive exactly the amount sent
    #[test]
    fn prop_exempt_transfer_is_untaxed(amount in 0u128..1_000_000_000) {
        let mut token = Token::deploy(OWNER, wallets(), &small_config()).unwrap();
        let recipient = Address::repeat_byte(0xa0);
        token.exclude_from_fees(OWNER, recipient, true).unwrap();

        token.transfer(OWNER, recipient, amount).unwrap();
        prop_assert_eq!(token.balance_of(recipient), amount);
    }

    /// Property: taxed transfers credit strictly less than sent
    #[test]
    fn prop_taxed_transfer_is_strictly_less(amount in 100u128..50_000_000) {
        let mut token = Token::deploy(OWNER, wallets(), &small_config()).unwrap();
        let sender = Address::repeat_byte(0xa0);
        let recipient = Address::repeat_byte(0xa1);
        token.transfer(OWNER, sender, amount).unwrap();

        // 1% of anything >= 100 is at least 1
        token.transfer(sender, recipient, amount).unwrap();
        prop_assert!(token.balance_of(recipient) < amount);
    }
}

#[cfg(test)]
mod scenarios {
    use super::*;
    use token_ledger::Error;

    #[test]
    fn test_sell_then_buy_round_trip() {
        let mut token = Token::deploy(OWNER, wallets(), &small_config()).unwrap();
        let trader = Address::repeat_byte(0xa0);
        token.set_uniswap_pair(OWNER, PAIR).unwrap();
        token.transfer(OWNER, trader, 1_000_000).unwrap();

        // Sell 5%, then buy back at 3%
        token.transfer(trader, PAIR, 1_000_000).unwrap();
        assert_eq!(token.balance_of(PAIR), 950_000);

        token.transfer(PAIR, trader, 950_000).unwrap();
        assert_eq!(token.balance_of(trader), 921_500);
        assert_eq!(sum_of_balances(&token), token.total_supply());
    }

    #[test]
    fn test_cap_applies_to_transfer_from() {
        let mut token = Token::deploy(OWNER, wallets(), &small_config()).unwrap();
        let holder = Address::repeat_byte(0xa0);
        let spender = Address::repeat_byte(0xa1);
        token.transfer(OWNER, holder, 100_000_000).unwrap();
        token.approve(holder, spender, 100_000_000).unwrap();

        assert!(matches!(
            token.transfer_from(spender, holder, spender, 50_000_001),
            Err(Error::MaxTransactionExceeded { .. })
        ));
        assert_eq!(token.allowance(holder, spender), 100_000_000);
    }
}
