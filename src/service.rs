//! Batch orchestration.
//!
//! Creation runs split -> materialize -> store; processing runs fetch ->
//! submit. Nothing is stored unless the whole split succeeded.

use crate::config::Config;
use crate::decimal::Amount;
use crate::error::{PayoutError, Result};
use crate::gateway::{SimulatedGateway, SubmissionGateway, SubmissionResponse};
use crate::ledger::{BatchId, BatchLedger, InMemoryLedger};
use crate::splitter::AmountSplitter;
use crate::strategy::SplitStrategy;
use crate::transaction::{Transaction, TransactionFactory};
use log::{debug, info};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A stored batch with its transactions and totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDetails {
    pub batch_id: BatchId,
    pub transactions: Vec<Transaction>,
    pub transaction_count: usize,
    pub total_amount_sent: Amount,
}

/// Creates, stores and submits payout batches.
///
/// The ledger and gateway are injected, so the service owns no global state.
/// Split randomness comes from the service's own generator, locked only
/// while a split is being computed.
pub struct BatchService<L = InMemoryLedger, G = SimulatedGateway> {
    splitter: AmountSplitter,
    factory: TransactionFactory,
    ledger: L,
    gateway: G,
    rng: Mutex<StdRng>,
}

impl BatchService<InMemoryLedger, SimulatedGateway> {
    /// In-memory service with the simulated gateway, seeded from `config.seed`
    /// when present.
    pub fn from_config(config: &Config) -> Result<Self> {
        let splitter = AmountSplitter::new(config.splitter.clone())?;
        let (gateway, rng) = match config.seed {
            Some(seed) => (
                SimulatedGateway::with_seed(config.gateway.clone(), seed),
                StdRng::seed_from_u64(seed),
            ),
            None => (
                SimulatedGateway::new(config.gateway.clone()),
                StdRng::from_entropy(),
            ),
        };
        Ok(BatchService::new(splitter, InMemoryLedger::new(), gateway, rng))
    }
}

impl<L: BatchLedger, G: SubmissionGateway> BatchService<L, G> {
    pub fn new(splitter: AmountSplitter, ledger: L, gateway: G, rng: StdRng) -> Self {
        BatchService {
            splitter,
            factory: TransactionFactory::new(),
            ledger,
            gateway,
            rng: Mutex::new(rng),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Splits `total`, stores the resulting batch and returns its details.
    ///
    /// Splitter errors are returned unchanged; on any error nothing is stored.
    pub fn create_batch(
        &self,
        total: Amount,
        destination: &str,
        strategy: SplitStrategy,
    ) -> Result<BatchDetails> {
        if !total.is_positive() {
            return Err(PayoutError::InvalidAmount);
        }

        let amounts = {
            let mut rng = self.rng.lock();
            self.splitter.split(total, strategy, &mut *rng)?
        };
        let transactions = self.factory.materialize(&amounts, destination);
        let batch_id = self.ledger.create(transactions)?;

        let details = self.get_batch_details(&batch_id)?;
        info!(
            "Created batch {} ({}): {} transactions totalling {}",
            batch_id, strategy, details.transaction_count, details.total_amount_sent
        );
        Ok(details)
    }

    /// Submits every transaction of a stored batch, in order, and collects
    /// the confirmations.
    pub fn process_batch(&self, batch_id: &BatchId) -> Result<Vec<SubmissionResponse>> {
        let batch = self.ledger.get(batch_id)?;

        let responses = batch
            .transactions()
            .iter()
            .map(|tx| self.gateway.submit(tx))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Processed batch {}: {} submissions",
            batch_id,
            responses.len()
        );
        Ok(responses)
    }

    /// Full transaction list plus count and total of a stored batch.
    pub fn get_batch_details(&self, batch_id: &BatchId) -> Result<BatchDetails> {
        let batch = self.ledger.get(batch_id)?;
        let summary = batch.summary();
        debug!(
            "Batch {} holds {} transactions",
            batch_id, summary.transaction_count
        );

        Ok(BatchDetails {
            batch_id: summary.batch_id,
            transactions: batch.transactions().to_vec(),
            transaction_count: summary.transaction_count,
            total_amount_sent: summary.total_amount,
        })
    }
}
