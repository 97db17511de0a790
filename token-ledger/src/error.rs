//! Error types for the token ledger

use crate::types::{Address, Amount};
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every variant is raised before the first write of the failing operation,
/// so an `Err` always means no state changed.
#[derive(Error, Debug)]
pub enum Error {
    /// Sender balance is below the requested amount
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Current balance
        have: Amount,
        /// Requested amount
        need: Amount,
    },

    /// Spender allowance is below the requested amount
    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance {
        /// Current allowance
        have: Amount,
        /// Requested amount
        need: Amount,
    },

    /// Transfer attempted while the ledger is paused
    #[error("Transfers are paused")]
    EnforcedPause,

    /// `pause` called while already paused
    #[error("Ledger is already paused")]
    AlreadyPaused,

    /// `unpause` called while not paused
    #[error("Ledger is not paused")]
    NotPaused,

    /// Non-owner called an owner-only operation
    #[error("Unauthorized caller: {caller}")]
    Unauthorized {
        /// Address that attempted the call
        caller: Address,
    },

    /// Non-exempt transfer above the transaction cap
    #[error("Max transaction exceeded: amount {amount}, max {max}")]
    MaxTransactionExceeded {
        /// Requested amount
        amount: Amount,
        /// Current cap
        max: Amount,
    },

    /// Zero address supplied where a real address is required
    #[error("Invalid address: {0}")]
    InvalidAddress(&'static str),

    /// Transfer to the zero address
    #[error("Invalid recipient: zero address")]
    InvalidRecipient,

    /// Transfer from the zero address
    #[error("Invalid sender: zero address")]
    InvalidSender,

    /// Checked arithmetic failed
    #[error("Arithmetic overflow")]
    Overflow,

    /// Invariant violation (supply conservation, tax split, etc.)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot file missing, corrupted or inconsistent
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InsufficientBalance { .. } => "insufficient_balance",
            Error::InsufficientAllowance { .. } => "insufficient_allowance",
            Error::EnforcedPause => "enforced_pause",
            Error::AlreadyPaused => "already_paused",
            Error::NotPaused => "not_paused",
            Error::Unauthorized { .. } => "unauthorized",
            Error::MaxTransactionExceeded { .. } => "max_transaction_exceeded",
            Error::InvalidAddress(_) => "invalid_address",
            Error::InvalidRecipient => "invalid_recipient",
            Error::InvalidSender => "invalid_sender",
            Error::Overflow => "overflow",
            Error::InvariantViolation(_) => "invariant_violation",
            Error::Config(_) => "config",
            Error::Snapshot(_) => "snapshot",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
        }
    }
}
