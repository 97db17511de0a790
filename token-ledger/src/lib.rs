//! Victor Voltage Token Ledger
//!
//! Fee-on-transfer fungible token with single-owner administration.
//!
//! # Architecture
//!
//! - **Ledger**: balances and fixed total supply, changed only by balanced journals
//! - **AccessControl**: owner identity and the pause switch
//! - **Registries**: fee/reward exemptions and the liquidity pair
//! - **TaxEngine**: buy/sell/transfer rates and the treasury/LP/tithing split
//! - **TransactionGuard**: per-transaction cap for non-exempt parties
//! - **Token**: composes the above; every mutation names its caller
//!
//! # Invariants
//!
//! - Supply conservation: Σ(balances) == total_supply at every observable point
//! - Exact split: treasury + lp + tithing == tax for every transfer
//! - All-or-nothing: a failed operation changes no state and emits no event

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod access;
pub mod config;
pub mod error;
pub mod guard;
pub mod ledger;
pub mod metrics;
pub mod ops;
pub mod registry;
pub mod scenario;
pub mod snapshot;
pub mod tax;
pub mod token;
pub mod types;

// Re-exports
pub use config::{Config, TaxConfig, TokenConfig};
pub use error::{Error, Result};
pub use ops::{Operation, Outcome};
pub use tax::{TaxAssessment, TaxSplit};
pub use token::{Token, TransferReceipt};
pub use types::{Address, Amount, EventRecord, TokenEvent, TransferKind, WalletRole, Wallets};
