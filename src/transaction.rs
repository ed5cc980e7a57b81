//! Payout transactions and their construction from split amounts.

use crate::decimal::Amount;
use uuid::Uuid;

/// A single sub-transaction of a batch.
///
/// Fields are private: once materialized, a transaction is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Amount carried by this transaction
    amount: Amount,

    /// Unique end-to-end identifier used to reconcile with the payment network
    external_id: Uuid,

    /// Destination key the payout is sent to
    destination: String,
}

impl Transaction {
    /// Creates a transaction with the given identifier.
    pub fn new(amount: Amount, external_id: Uuid, destination: impl Into<String>) -> Self {
        Transaction {
            amount,
            external_id,
            destination: destination.into(),
        }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn external_id(&self) -> Uuid {
        self.external_id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

/// Wraps split amounts into transactions with fresh identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFactory;

impl TransactionFactory {
    pub fn new() -> Self {
        TransactionFactory
    }

    /// Creates one transaction per amount, in the same order, all sent to
    /// `destination`.
    pub fn materialize(&self, amounts: &[Amount], destination: &str) -> Vec<Transaction> {
        amounts
            .iter()
            .map(|&amount| Transaction::new(amount, Uuid::new_v4(), destination))
            .collect()
    }
}
