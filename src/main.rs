//! Payout Splitter CLI
//!
//! Reads batch requests from CSV, splits every one of them, then submits the
//! batches and writes every confirmed sub-transaction as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- requests.csv [config.toml] > payouts.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` or `debug` to control logging verbosity
//!
//! # Exit Status
//!
//! Each failure kind exits with its own code, see `PayoutError::exit_code`.

use log::warn;
use payout_splitter::{
    read_requests, write_report, BatchService, Config, PayoutError, ProcessedBatch, Result,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(PayoutError::MissingArgument);
    }

    let config = match args.get(2) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let file = File::open(&args[1])?;
    let requests = read_requests(BufReader::new(file))?;

    let service = BatchService::from_config(&config)?;

    // Every row is split and stored before anything is submitted, so a bad
    // row later in the file leaves no submissions behind.
    let mut created = Vec::with_capacity(requests.len());
    for request in &requests {
        let details = service
            .create_batch(request.total, &request.destination, request.strategy)
            .map_err(|e| {
                warn!("Row {}: {}", request.row, e);
                e
            })?;
        created.push(details);
    }

    let mut processed = Vec::with_capacity(created.len());
    for details in created {
        let responses = service.process_batch(&details.batch_id)?;
        processed.push(ProcessedBatch { details, responses });
    }

    let stdout = io::stdout();
    let handle = stdout.lock();
    write_report(handle, &processed)?;

    Ok(())
}
