//! Quote scraper binary.
//!
//! Scrapes the equities quote page of each requested HKEX code and writes a
//! CSV sorted by code. The run has three phases:
//!
//! - resolve the code list (first N of the universe, or a codes file);
//! - run the worker pool, appending each row to the temporary store as soon
//!   as it is fetched;
//! - finalize: sort the temporary store into the output file and remove it.
//!
//! Per-code failures never fail the run; they show up as rows with a non-OK
//! status. Ctrl+C or `--run-timeout-secs` stop dispatching, and the rows
//! already written are still finalized.
//!
//! Usage example (CLI):
//! ```bash
//! quote_scraper -n 200 --workers 8 -o stock_data.csv
//! ```
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use quote_common::Result;
use quote_common::error::StartupError;
use quote_common::store::{TempStore, finalize};
use quote_scraper::args::Args;
use quote_scraper::cancel::CancelToken;
use quote_scraper::config::ScraperConfig;
use quote_scraper::fetcher::HkexFetcher;
use quote_scraper::pool::WorkerPool;
use quote_scraper::session::HttpSessionProvider;

fn main() -> ExitCode {
    let args = Args::parse();
    quote_common::logging::init(args.log_target().as_deref());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = ScraperConfig::try_from(args)?;
    let codes = config.load_codes()?;
    info!("Scraping {} stock codes with {} workers", codes.len(), config.workers);

    let cancel = match config.run_timeout {
        Some(limit) => CancelToken::new().with_deadline(limit),
        None => CancelToken::new(),
    };
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Ctrl+C received. Finishing in-flight codes...");
            cancel.cancel();
        }) {
            warn!("Cannot install Ctrl+C handler: {}", e);
        }
    }

    let store = TempStore::create(&config.temp_path).map_err(|source| StartupError::TempStore {
        path: config.temp_path.clone(),
        source,
    })?;
    let provider = HttpSessionProvider::new(config.session.clone());
    let fetcher = HkexFetcher::new(config.base_url.clone());

    let report = WorkerPool::new(&provider, &fetcher, &store, config.pool.clone(), cancel)
        .run(&codes, config.workers)?;
    info!("Scrape complete. {}", report);
    drop(store);

    let summary = finalize(&config.temp_path, &config.output_path)?;
    info!(
        "CSV data sorted and written to {} ({} rows)",
        config.output_path.display(),
        summary.total
    );
    Ok(())
}
