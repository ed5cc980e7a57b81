//! Batch ledger: keyed storage of created batches.
//!
//! A batch is inserted in one step under the write lock, so readers see
//! either the whole batch or nothing. Stored batches are shared as
//! `Arc<Batch>` and never mutated.

use crate::decimal::Amount;
use crate::error::{PayoutError, Result};
use crate::transaction::Transaction;
use log::debug;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Unique batch identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BatchId(Uuid);

impl BatchId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        BatchId(Uuid::new_v4())
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(BatchId)
    }
}

/// An ordered, immutable set of transactions produced by one split request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    id: BatchId,
    transactions: Vec<Transaction>,
}

impl Batch {
    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Sum of all transaction amounts.
    pub fn total(&self) -> Amount {
        self.transactions.iter().map(|tx| tx.amount()).sum()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            batch_id: self.id,
            transaction_count: self.transactions.len(),
            total_amount: self.total(),
        }
    }
}

/// Count and total of a stored batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub batch_id: BatchId,
    pub transaction_count: usize,
    pub total_amount: Amount,
}

/// Storage contract for batches.
///
/// `InMemoryLedger` is the process-scoped implementation; a database-backed
/// store can implement the same trait.
pub trait BatchLedger: Send + Sync {
    /// Stores `transactions` as a new batch under a freshly generated id.
    fn create(&self, transactions: Vec<Transaction>) -> Result<BatchId>;

    /// Fetches a batch, failing with `NotFound` for unknown ids.
    fn get(&self, id: &BatchId) -> Result<Arc<Batch>>;

    /// Count and total of a stored batch.
    fn summarize(&self, id: &BatchId) -> Result<BatchSummary> {
        Ok(self.get(id)?.summary())
    }
}

/// Ledger kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    batches: RwLock<HashMap<BatchId, Arc<Batch>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        InMemoryLedger {
            batches: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored batches.
    pub fn len(&self) -> usize {
        self.batches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.read().is_empty()
    }
}

impl BatchLedger for InMemoryLedger {
    fn create(&self, transactions: Vec<Transaction>) -> Result<BatchId> {
        let mut batches = self.batches.write();
        loop {
            let id = BatchId::generate();
            if let Entry::Vacant(slot) = batches.entry(id) {
                debug!("Stored batch {} with {} transactions", id, transactions.len());
                slot.insert(Arc::new(Batch { id, transactions }));
                return Ok(id);
            }
        }
    }

    fn get(&self, id: &BatchId) -> Result<Arc<Batch>> {
        self.batches
            .read()
            .get(id)
            .cloned()
            .ok_or(PayoutError::NotFound(*id))
    }
}
