//! Core types for the token ledger
//!
//! All types are designed for:
//! - Deterministic serialization (bincode, ordered maps)
//! - Exact integer arithmetic (`u128` base units)
//! - Human-readable configuration (addresses as hex strings)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token amount in base units
pub type Amount = u128;

/// Number of bytes in an address
pub const ADDRESS_LEN: usize = 20;

/// 20-byte account address
///
/// Serialized as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null address. Never a valid owner, wallet, pair or recipient.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Address with every byte set to `byte`
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; ADDRESS_LEN])
    }

    /// Check for the null address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl FromStr for Address {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        let bytes = hex::decode(digits).map_err(|_| crate::Error::InvalidAddress("malformed hex"))?;
        let bytes: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| crate::Error::InvalidAddress("expected 20 bytes"))?;

        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// Direction of a transfer relative to the liquidity pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// Tokens leave the pair (`from == pair`)
    Buy,
    /// Tokens enter the pair (`to == pair`)
    Sell,
    /// Neither side is the pair
    Transfer,
}

impl TransferKind {
    /// Stable label for metrics and logs
    pub fn label(&self) -> &'static str {
        match self {
            TransferKind::Buy => "buy",
            TransferKind::Sell => "sell",
            TransferKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tax beneficiary wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletRole {
    /// Treasury wallet (receives the rounding remainder)
    Treasury,
    /// Liquidity wallet
    Lp,
    /// Tithing wallet
    Tithing,
}

impl fmt::Display for WalletRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletRole::Treasury => f.write_str("treasury"),
            WalletRole::Lp => f.write_str("lp"),
            WalletRole::Tithing => f.write_str("tithing"),
        }
    }
}

/// The three tax beneficiary wallets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallets {
    /// Treasury wallet
    pub treasury: Address,
    /// Liquidity wallet
    pub lp: Address,
    /// Tithing wallet
    pub tithing: Address,
}

impl Wallets {
    /// Get wallet by role
    pub fn get(&self, role: WalletRole) -> Address {
        match role {
            WalletRole::Treasury => self.treasury,
            WalletRole::Lp => self.lp,
            WalletRole::Tithing => self.tithing,
        }
    }

    /// Reject the zero address in any slot
    pub fn validate(&self) -> crate::Result<()> {
        if self.treasury.is_zero() {
            return Err(crate::Error::InvalidAddress("treasury wallet"));
        }
        if self.lp.is_zero() {
            return Err(crate::Error::InvalidAddress("lp wallet"));
        }
        if self.tithing.is_zero() {
            return Err(crate::Error::InvalidAddress("tithing wallet"));
        }
        Ok(())
    }
}

/// State change recorded by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenEvent {
    /// Value moved between accounts (mint uses `from == ZERO`)
    Transfer {
        /// Debited account
        from: Address,
        /// Credited account
        to: Address,
        /// Amount credited
        amount: Amount,
    },
    /// Allowance set
    Approval {
        /// Token holder
        holder: Address,
        /// Approved spender
        spender: Address,
        /// New allowance
        amount: Amount,
    },
    /// Tax withheld from a transfer
    TaxCollected {
        /// Sender
        from: Address,
        /// Recipient
        to: Address,
        /// Buy / sell / transfer
        kind: TransferKind,
        /// Total tax
        tax: Amount,
    },
    /// Transfers halted
    Paused {
        /// Caller
        account: Address,
    },
    /// Transfers resumed
    Unpaused {
        /// Caller
        account: Address,
    },
    /// Owner changed
    OwnershipTransferred {
        /// Previous owner
        previous: Address,
        /// New owner (zero after renounce)
        new: Address,
    },
    /// Fee exemption flag set or cleared
    FeeExemptionUpdated {
        /// Account
        account: Address,
        /// New flag
        excluded: bool,
    },
    /// Reward exemption flag set or cleared
    RewardExemptionUpdated {
        /// Account
        account: Address,
        /// New flag
        excluded: bool,
    },
    /// Liquidity pair replaced
    PairUpdated {
        /// Previous pair (zero if unset)
        previous: Address,
        /// New pair
        new: Address,
    },
    /// Beneficiary wallet replaced
    WalletUpdated {
        /// Which wallet
        role: WalletRole,
        /// Previous address
        previous: Address,
        /// New address
        new: Address,
    },
    /// Transaction cap replaced
    MaxTransactionAmountUpdated {
        /// Previous cap
        previous: Amount,
        /// New cap
        new: Amount,
    },
}

/// Event with its position in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0
    pub sequence: u64,
    /// The event
    pub event: TokenEvent,
}
