//! Manual recovery for a scraper run that did not finalize.
//!
//! When the scraper fails to finalize, or is killed before it gets there,
//! the temporary store stays on disk. This tool sorts it into the final
//! artifact exactly as the scraper would have.
//!
//! Usage example (CLI):
//! ```bash
//! quote_finalize --temp stock_data_temp.csv -o stock_data.csv
//! ```
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use quote_common::QuoteError;
use quote_common::store::{DEFAULT_FINAL_PATH, DEFAULT_TEMP_PATH, finalize};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Finalize a leftover quote scraper temporary store", long_about = None)]
struct Args {
    /// Temporary store left by the scraper.
    #[arg(long, default_value = DEFAULT_TEMP_PATH)]
    temp: PathBuf,

    /// Final CSV artifact; overwritten if present.
    #[arg(short = 'o', long, default_value = DEFAULT_FINAL_PATH)]
    output: PathBuf,
}

fn main() -> ExitCode {
    quote_common::logging::init(None);
    let args = Args::parse();

    match finalize(&args.temp, &args.output) {
        Ok(summary) => {
            info!("Recovered {} rows into {}", summary.total, args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let e = QuoteError::from(e);
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
