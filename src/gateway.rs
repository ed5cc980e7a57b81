//! Submission of transactions to the payment network.
//!
//! The real network call lives outside this crate; `SimulatedGateway` stands
//! in for it and answers every submission with a confirmation.

use crate::config::GatewayConfig;
use crate::decimal::Amount;
use crate::error::Result;
use crate::transaction::Transaction;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Confirmation returned for one submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResponse {
    pub external_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub confirmation_id: u32,
    pub amount: Amount,
    pub currency: String,
    pub transaction_type: String,
}

/// Sends a single transaction to the payment network.
///
/// Retry and timeout policy belong to implementations, not to callers.
pub trait SubmissionGateway: Send + Sync {
    fn submit(&self, transaction: &Transaction) -> Result<SubmissionResponse>;
}

/// Stub gateway that confirms every transaction.
///
/// Confirmation ids are six-digit numbers drawn from its own generator, so
/// a seeded gateway answers identically across runs.
#[derive(Debug)]
pub struct SimulatedGateway {
    config: GatewayConfig,
    event_date: DateTime<Utc>,
    rng: Mutex<StdRng>,
}

impl SimulatedGateway {
    /// Gateway seeded from OS entropy.
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Gateway with reproducible confirmation ids.
    pub fn with_seed(config: GatewayConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GatewayConfig, rng: StdRng) -> Self {
        SimulatedGateway {
            config,
            event_date: simulated_event_date(),
            rng: Mutex::new(rng),
        }
    }
}

impl SubmissionGateway for SimulatedGateway {
    fn submit(&self, transaction: &Transaction) -> Result<SubmissionResponse> {
        let confirmation_id = self.rng.lock().gen_range(100_000..=999_999);
        debug!(
            "Submitted {} of {} to {}, confirmation {}",
            transaction.external_id(),
            transaction.amount(),
            transaction.destination(),
            confirmation_id
        );

        Ok(SubmissionResponse {
            external_id: transaction.external_id(),
            timestamp: self.event_date,
            confirmation_id,
            amount: transaction.amount(),
            currency: self.config.currency.clone(),
            transaction_type: self.config.transaction_type.clone(),
        })
    }
}

/// Fixed event date stamped on simulated confirmations.
fn simulated_event_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(cents: i64) -> Transaction {
        Transaction::new(Amount::from_cents(cents), Uuid::new_v4(), "dest")
    }

    #[test]
    fn test_response_echoes_transaction() {
        let gateway = SimulatedGateway::new(GatewayConfig::default());
        let tx = tx(12_345);
        let response = gateway.submit(&tx).unwrap();

        assert_eq!(response.external_id, tx.external_id());
        assert_eq!(response.amount.to_string(), "123.45");
        assert_eq!(response.currency, "BRL");
        assert_eq!(response.transaction_type, "PIX_CASH_OUT");
        assert_eq!(response.timestamp.to_rfc3339(), "2024-06-15T10:30:00+00:00");
        assert!((100_000..=999_999).contains(&response.confirmation_id));
    }

    #[test]
    fn test_uses_configured_currency() {
        let config = GatewayConfig {
            currency: "USD".to_string(),
            transaction_type: "WIRE".to_string(),
        };
        let response = SimulatedGateway::new(config).submit(&tx(1)).unwrap();
        assert_eq!(response.currency, "USD");
        assert_eq!(response.transaction_type, "WIRE");
    }

    #[test]
    fn test_seeded_confirmations_repeat() {
        let tx = tx(500);
        let a = SimulatedGateway::with_seed(GatewayConfig::default(), 9);
        let b = SimulatedGateway::with_seed(GatewayConfig::default(), 9);
        for _ in 0..5 {
            assert_eq!(a.submit(&tx).unwrap(), b.submit(&tx).unwrap());
        }
    }
}
