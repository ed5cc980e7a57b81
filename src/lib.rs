//! # Payout Splitter
//!
//! Splits a single payout total into an ordered batch of sub-transactions,
//! each at or below a fixed per-transaction ceiling, and keeps the batch for
//! later submission.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 2 decimal places via `rust_decimal`, splits computed in cents
//! - **Strict invariants**: every item in `(0, ceiling]`, sum reconciles to the total
//! - **Injected randomness**: random strategies take a seedable generator
//! - **All-or-nothing batches**: nothing is stored unless the split succeeded
//!
//! ## Example
//!
//! ```
//! use payout_splitter::{Amount, BatchService, Config, SplitStrategy};
//! use std::str::FromStr;
//!
//! let service = BatchService::from_config(&Config::default()).unwrap();
//! let total = Amount::from_str("20000.00").unwrap();
//! let batch = service
//!     .create_batch(total, "alice@pix", SplitStrategy::EqualCapped)
//!     .unwrap();
//! assert_eq!(batch.transaction_count, 2);
//!
//! let confirmations = service.process_batch(&batch.batch_id).unwrap();
//! assert_eq!(confirmations.len(), 2);
//! ```

pub mod config;
pub mod decimal;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod report;
pub mod request;
pub mod service;
pub mod splitter;
pub mod strategy;
pub mod transaction;

pub use config::{Config, GatewayConfig, SplitterConfig};
pub use decimal::Amount;
pub use error::{PayoutError, Result};
pub use gateway::{SimulatedGateway, SubmissionGateway, SubmissionResponse};
pub use ledger::{Batch, BatchId, BatchLedger, BatchSummary, InMemoryLedger};
pub use report::{write_report, ProcessedBatch};
pub use request::{read_requests, BatchRequest, BatchRequestRecord};
pub use service::{BatchDetails, BatchService};
pub use splitter::AmountSplitter;
pub use strategy::SplitStrategy;
pub use transaction::{Transaction, TransactionFactory};
