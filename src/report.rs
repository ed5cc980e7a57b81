//! CSV report of submitted transactions.

use crate::decimal::Amount;
use crate::error::Result;
use crate::gateway::SubmissionResponse;
use crate::ledger::BatchId;
use crate::service::BatchDetails;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use uuid::Uuid;

/// Column header of the report.
pub const REPORT_HEADER: [&str; 8] = [
    "batch_id",
    "external_id",
    "destination",
    "amount",
    "confirmation_id",
    "currency",
    "transaction_type",
    "timestamp",
];

/// A created batch together with the gateway's answers for it.
#[derive(Debug, Clone)]
pub struct ProcessedBatch {
    pub details: BatchDetails,
    pub responses: Vec<SubmissionResponse>,
}

/// One report line; field order follows `REPORT_HEADER`.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    batch_id: BatchId,
    external_id: Uuid,
    destination: &'a str,
    amount: Amount,
    confirmation_id: u32,
    currency: &'a str,
    transaction_type: &'a str,
    timestamp: String,
}

/// Writes one line per submitted transaction, batches in the given order.
///
/// Amounts are formatted with exactly 2 decimal places. The header is always
/// written, even when there are no batches.
pub fn write_report<W: Write>(writer: W, batches: &[ProcessedBatch]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer.write_record(REPORT_HEADER)?;

    for batch in batches {
        for (tx, response) in batch.details.transactions.iter().zip(&batch.responses) {
            csv_writer.serialize(ReportRow {
                batch_id: batch.details.batch_id,
                external_id: tx.external_id(),
                destination: tx.destination(),
                amount: tx.amount(),
                confirmation_id: response.confirmation_id,
                currency: &response.currency,
                transaction_type: &response.transaction_type,
                timestamp: response.timestamp.to_rfc3339(),
            })?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}
