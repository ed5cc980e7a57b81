//! Error types for the payout splitter.

use crate::decimal::Amount;
use crate::ledger::BatchId;
use thiserror::Error;

/// Result type alias for splitter and batch operations
pub type Result<T> = std::result::Result<T, PayoutError>;

/// Errors that can occur while splitting, storing or processing batches.
#[derive(Error, Debug)]
pub enum PayoutError {
    /// Requested total is zero or negative (or too large to represent in cents)
    #[error("Total amount must be greater than zero")]
    InvalidAmount,

    /// Bad method selector, missing or out-of-range explicit count, bad config value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No partition exists under the ceiling/count constraints
    #[error("Cannot split amount within constraints: {0}")]
    InfeasibleSplit(String),

    /// Computed sum deviates from the requested total beyond tolerance
    #[error("Sum of transactions {actual} does not match requested amount {expected}")]
    ReconciliationMismatch { expected: Amount, actual: Amount },

    /// Batch id unknown to the ledger
    #[error("Batch ID {0} not found")]
    NotFound(BatchId),

    /// Failed to open or read a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed TOML configuration
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Batch request row that could not be decoded
    #[error("Invalid request at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: payout-splitter <requests.csv> [config.toml]")]
    MissingArgument,
}

impl PayoutError {
    /// Process exit status for this failure kind. Every kind gets its own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            PayoutError::Io(_) | PayoutError::Csv(_) | PayoutError::MissingArgument => 1,
            PayoutError::InvalidAmount => 2,
            PayoutError::InvalidParameter(_) => 3,
            PayoutError::InfeasibleSplit(_) => 4,
            PayoutError::ReconciliationMismatch { .. } => 5,
            PayoutError::NotFound(_) => 6,
            PayoutError::InvalidRecord { .. } => 7,
            PayoutError::Config(_) => 8,
        }
    }
}
