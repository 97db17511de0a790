//! Configuration for the token ledger
//!
//! Amounts are written as decimal strings in TOML because the default supply
//! does not fit in a TOML integer.

use crate::types::{Address, Amount, Wallets};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Basis-point denominator (100%)
pub const MAX_BPS: u16 = 10_000;

/// Token decimals
pub const DEFAULT_DECIMALS: u8 = 18;

/// Whole tokens minted at deployment
pub const DEFAULT_WHOLE_SUPPLY: Amount = 170_000_000_000_000;

/// Tax on buys from the pair (3%)
pub const DEFAULT_BUY_TAX_BPS: u16 = 300;

/// Tax on sells into the pair (5%)
pub const DEFAULT_SELL_TAX_BPS: u16 = 500;

/// Tax on wallet-to-wallet transfers (1%)
pub const DEFAULT_TRANSFER_TAX_BPS: u16 = 100;

/// Treasury share of collected tax (40%); also absorbs rounding remainder
pub const DEFAULT_TREASURY_SHARE_BPS: u16 = 4_000;

/// LP share of collected tax (40%)
pub const DEFAULT_LP_SHARE_BPS: u16 = 4_000;

/// Tithing share of collected tax (20%)
pub const DEFAULT_TITHING_SHARE_BPS: u16 = 2_000;

/// Max transaction as a fraction of supply (1%)
pub const DEFAULT_MAX_TRANSACTION_BPS: u16 = 100;

/// Wallet used by the reference deployment for all three beneficiaries
pub const DEFAULT_WALLET: Address = Address::from_bytes([
    0x2d, 0x41, 0x23, 0x4d, 0x5f, 0xbb, 0x78, 0x53, 0x37, 0xec, 0x16, 0x11, 0x2f, 0x7a, 0x92, 0xd5,
    0x83, 0x92, 0xa1, 0xc5,
]);

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Token parameters
    #[serde(default)]
    pub token: TokenConfig,

    /// Deployment inputs
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Snapshot configuration
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Token metadata and policy parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Token name
    pub name: String,

    /// Ticker symbol
    pub symbol: String,

    /// Display decimals
    pub decimals: u8,

    /// Total supply in base units, minted once to the deployer
    #[serde(with = "amount_string")]
    pub total_supply: Amount,

    /// Initial max transaction amount in base units
    #[serde(with = "amount_string")]
    pub max_transaction_amount: Amount,

    /// Tax policy
    pub tax: TaxConfig,
}

impl Default for TokenConfig {
    fn default() -> Self {
        let total_supply = DEFAULT_WHOLE_SUPPLY * 10u128.pow(DEFAULT_DECIMALS as u32);
        Self {
            name: "Victor Voltage".to_string(),
            symbol: "VVT".to_string(),
            decimals: DEFAULT_DECIMALS,
            total_supply,
            max_transaction_amount: total_supply / MAX_BPS as Amount
                * DEFAULT_MAX_TRANSACTION_BPS as Amount,
            tax: TaxConfig::default(),
        }
    }
}

/// Tax rates and beneficiary split, all in basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Rate applied when `from == pair`
    pub buy_tax_bps: u16,
    /// Rate applied when `to == pair`
    pub sell_tax_bps: u16,
    /// Rate applied otherwise
    pub transfer_tax_bps: u16,
    /// Treasury share of each tax
    pub treasury_share_bps: u16,
    /// LP share of each tax
    pub lp_share_bps: u16,
    /// Tithing share of each tax
    pub tithing_share_bps: u16,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            buy_tax_bps: DEFAULT_BUY_TAX_BPS,
            sell_tax_bps: DEFAULT_SELL_TAX_BPS,
            transfer_tax_bps: DEFAULT_TRANSFER_TAX_BPS,
            treasury_share_bps: DEFAULT_TREASURY_SHARE_BPS,
            lp_share_bps: DEFAULT_LP_SHARE_BPS,
            tithing_share_bps: DEFAULT_TITHING_SHARE_BPS,
        }
    }
}

impl TaxConfig {
    /// Check rate bounds and that the split covers exactly 100%
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("buy_tax_bps", self.buy_tax_bps),
            ("sell_tax_bps", self.sell_tax_bps),
            ("transfer_tax_bps", self.transfer_tax_bps),
        ] {
            if rate > MAX_BPS {
                return Err(Error::Config(format!(
                    "{} is {}, must be at most {}",
                    name, rate, MAX_BPS
                )));
            }
        }

        let split = self.treasury_share_bps as u32
            + self.lp_share_bps as u32
            + self.tithing_share_bps as u32;
        if split != MAX_BPS as u32 {
            return Err(Error::Config(format!(
                "tax shares sum to {} bps, expected {}",
                split, MAX_BPS
            )));
        }

        Ok(())
    }
}

/// Deployment inputs: who deploys and where tax goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Initial owner; receives the entire supply
    pub deployer: Address,

    /// Tax beneficiaries
    pub wallets: Wallets,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            deployer: DEFAULT_WALLET,
            wallets: Wallets {
                treasury: DEFAULT_WALLET,
                lp: DEFAULT_WALLET,
                tithing: DEFAULT_WALLET,
            },
        }
    }
}

/// Snapshot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Where to write the final state snapshot, if anywhere
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults with environment variable overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TOKEN_*` environment overrides on top of the current values
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(deployer) = env_address("TOKEN_DEPLOYER")? {
            self.deployment.deployer = deployer;
        }

        if let Some(wallet) = env_address("TOKEN_TREASURY_WALLET")? {
            self.deployment.wallets.treasury = wallet;
        }

        if let Some(wallet) = env_address("TOKEN_LP_WALLET")? {
            self.deployment.wallets.lp = wallet;
        }

        if let Some(wallet) = env_address("TOKEN_TITHING_WALLET")? {
            self.deployment.wallets.tithing = wallet;
        }

        if let Ok(max) = std::env::var("TOKEN_MAX_TRANSACTION_AMOUNT") {
            self.token.max_transaction_amount = parse_amount(&max).map_err(|e| {
                Error::Config(format!("TOKEN_MAX_TRANSACTION_AMOUNT: {}", e))
            })?;
        }

        if let Ok(path) = std::env::var("TOKEN_SNAPSHOT_PATH") {
            self.snapshot.path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.total_supply == 0 {
            return Err(Error::Config("total_supply must be positive".to_string()));
        }
        if self.deployment.deployer.is_zero() {
            return Err(Error::Config("deployer must not be the zero address".to_string()));
        }
        self.token.tax.validate()?;
        self.deployment
            .wallets
            .validate()
            .map_err(|e| Error::Config(e.to_string()))
    }
}

/// Parse a decimal amount, allowing `_` digit separators
fn parse_amount(text: &str) -> std::result::Result<Amount, std::num::ParseIntError> {
    text.replace('_', "").parse()
}

fn env_address(key: &str) -> Result<Option<Address>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Serde adapter for `u128` amounts: written as strings, read from strings
/// or integers.
pub mod amount_string {
    use crate::types::Amount;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    /// Serialize as a decimal string
    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    /// Deserialize from a decimal string or a non-negative integer
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(v as Amount)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            Amount::try_from(v).map_err(|_| E::custom("amount must not be negative"))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            super::parse_amount(v).map_err(E::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_accepts_separators() {
        assert_eq!(parse_amount("1_000").unwrap(), 1_000);
        assert_eq!(parse_amount("1000").unwrap(), 1_000);
        assert!(parse_amount("1_0x0").is_err());
        assert!(parse_amount("-5").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.token.symbol, "VVT");
        assert_eq!(config.token.decimals, 18);
        assert_eq!(
            config.token.total_supply,
            170_000_000_000_000 * 1_000_000_000_000_000_000
        );
        assert_eq!(config.token.max_transaction_amount, config.token.total_supply / 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_with_string_amounts() {
        let toml_str = r#"
            [token]
            name = "Test"
            symbol = "TST"
            total_supply = "1_000_000"
            max_transaction_amount = 5000

            [token.tax]
            sell_tax_bps = 800

            [deployment]
            deployer = "0x0101010101010101010101010101010101010101"

            [deployment.wallets]
            treasury = "0x0202020202020202020202020202020202020202"
            lp = "0x0303030303030303030303030303030303030303"
            tithing = "0x0404040404040404040404040404040404040404"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.token.total_supply, 1_000_000);
        assert_eq!(config.token.max_transaction_amount, 5000);
        assert_eq!(config.token.tax.sell_tax_bps, 800);
        assert_eq!(config.token.tax.buy_tax_bps, DEFAULT_BUY_TAX_BPS);
        assert_eq!(config.deployment.wallets.lp, Address::repeat_byte(3));
        assert!(config.snapshot.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.token, config.token);
        assert_eq!(back.deployment, config.deployment);
    }

    #[test]
    fn test_validate_rejects_bad_split() {
        let mut config = Config::default();
        config.token.tax.tithing_share_bps = 1_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tax shares"));
    }

    #[test]
    fn test_validate_rejects_rate_above_100_percent() {
        let mut tax = TaxConfig::default();
        tax.sell_tax_bps = MAX_BPS + 1;
        assert!(matches!(tax.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_wallet() {
        let mut config = Config::default();
        config.deployment.wallets.lp = Address::ZERO;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.toml");
        std::fs::write(&path, toml::to_string(&Config::default()).unwrap()).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.deployment.deployer, DEFAULT_WALLET);
    }
}
