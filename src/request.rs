//! Batch creation requests read from CSV.

use crate::decimal::Amount;
use crate::error::{PayoutError, Result};
use crate::strategy::SplitStrategy;
use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// Raw request row as read from CSV.
///
/// Header: `total,destination,method,payment_count,shuffle`. The last two
/// columns may be empty or missing.
#[derive(Debug, Deserialize)]
pub struct BatchRequestRecord {
    /// Total to pay out, as written in the file
    pub total: String,

    /// Destination key
    pub destination: String,

    /// Split method code, 1 to 4
    pub method: i64,

    /// Explicit payment count (method 4)
    pub payment_count: Option<i64>,

    /// Draw the payment count at random (method 2)
    pub shuffle: Option<bool>,
}

impl BatchRequestRecord {
    /// Validates the raw record into a typed request.
    ///
    /// `row` is only used for error reporting.
    pub fn parse(&self, row: usize) -> Result<BatchRequest> {
        let total = Amount::from_str(&self.total).map_err(|e| PayoutError::InvalidRecord {
            row,
            message: format!("invalid total '{}': {}", self.total.trim(), e),
        })?;
        if !total.is_positive() {
            return Err(PayoutError::InvalidAmount);
        }

        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(PayoutError::InvalidRecord {
                row,
                message: "destination is empty".to_string(),
            });
        }

        let strategy = SplitStrategy::from_method(
            self.method,
            self.payment_count,
            self.shuffle.unwrap_or(false),
        )?;

        Ok(BatchRequest {
            row,
            total,
            destination: destination.to_string(),
            strategy,
        })
    }
}

/// A validated batch creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// CSV row the request came from (1-indexed, header is row 1)
    pub row: usize,
    pub total: Amount,
    pub destination: String,
    pub strategy: SplitStrategy,
}

/// Reads every request from a CSV source.
///
/// Stops at the first undecodable or invalid row; a payout file is either
/// accepted whole or not at all.
pub fn read_requests<R: Read>(reader: R) -> Result<Vec<BatchRequest>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut requests = Vec::new();
    for (row_idx, result) in csv_reader.deserialize::<BatchRequestRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = result.map_err(|e| {
            warn!("Row {}: {}", row_num, e);
            PayoutError::InvalidRecord {
                row: row_num,
                message: e.to_string(),
            }
        })?;
        let request = record.parse(row_num).map_err(|e| {
            warn!("Row {}: {}", row_num, e);
            e
        })?;
        requests.push(request);
    }

    Ok(requests)
}
