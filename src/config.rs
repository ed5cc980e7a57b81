//! Runtime configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides. Amounts are written as strings to keep them exact.
//!
//! # Example TOML
//! ```toml
//! seed = 42
//!
//! [splitter]
//! ceiling = "14999.99"
//! tolerance = "0.02"
//! max_payments = 100
//!
//! [gateway]
//! currency = "BRL"
//! transaction_type = "PIX_CASH_OUT"
//! ```

use crate::decimal::Amount;
use crate::error::{PayoutError, Result};
use serde::Deserialize;
use std::fs;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub splitter: SplitterConfig,
    pub gateway: GatewayConfig,
    /// Seed for every random source; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

/// Limits and counts used by the amount splitter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Maximum amount of a single sub-transaction.
    pub ceiling: Amount,
    /// Allowed gap between the requested total and the sum of the split.
    pub tolerance: Amount,
    /// Upper bound on the item count of the bounded random strategies.
    pub max_payments: u32,
    /// How many items above the minimum the auto strategy may add.
    pub extra_payments: u32,
    /// Inclusive range for the shuffled randomized-count strategy.
    pub shuffled_count_min: u32,
    pub shuffled_count_max: u32,
    /// Count used by the randomized-count strategy when not shuffling.
    pub fixed_count: u32,
    /// Hard cap on items produced by the even-spread strategies.
    pub max_split_count: u64,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        SplitterConfig {
            ceiling: Amount::from_cents(1_499_999),
            tolerance: Amount::from_cents(2),
            max_payments: 100,
            extra_payments: 10,
            shuffled_count_min: 3,
            shuffled_count_max: 10,
            fixed_count: 7,
            max_split_count: 1_000_000,
        }
    }
}

/// Values echoed back by the simulated submission gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub currency: String,
    pub transaction_type: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            currency: "BRL".to_string(),
            transaction_type: "PIX_CASH_OUT".to_string(),
        }
    }
}

impl Config {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the splitter cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.splitter.validate()
    }
}

impl SplitterConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.ceiling.is_positive() {
            return Err(invalid("ceiling must be greater than zero"));
        }
        if self.tolerance < Amount::ZERO {
            return Err(invalid("tolerance must not be negative"));
        }
        if self.max_payments == 0 || self.fixed_count == 0 || self.max_split_count == 0 {
            return Err(invalid("payment counts must be greater than zero"));
        }
        if self.shuffled_count_min == 0 || self.shuffled_count_min > self.shuffled_count_max {
            return Err(invalid(
                "shuffled_count_min must be positive and not above shuffled_count_max",
            ));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> PayoutError {
    PayoutError::InvalidParameter(message.to_string())
}
