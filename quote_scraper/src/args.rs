//! Command-line arguments for the quote scraper.
//!
//! Every flag can also be supplied through a `QUOTE_SCRAPER_*` environment
//! variable; an explicit flag wins.
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use quote_common::store::{DEFAULT_FINAL_PATH, DEFAULT_TEMP_PATH};

use crate::consts::{
    DEFAULT_COUNT, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_LOG_FILE, DEFAULT_WORKERS,
    DEFAULT_WRITE_RETRIES, HKEX_QUOTE_URL,
};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Scrape HKEX equity quotes into a sorted CSV", long_about = None)]
pub struct Args {
    /// Number of stock codes to scrape, taken from the start of the code universe.
    #[arg(short = 'n', long, env = "QUOTE_SCRAPER_COUNT", default_value = DEFAULT_COUNT)]
    pub count: NonZeroUsize,

    /// File with one stock code per line; replaces `--count` when given.
    #[arg(long, env = "QUOTE_SCRAPER_CODES_FILE", value_parser = parse_path)]
    pub codes_file: Option<PathBuf>,

    /// Number of parallel workers, each with its own session.
    #[arg(short = 'w', long, env = "QUOTE_SCRAPER_WORKERS", default_value = DEFAULT_WORKERS)]
    pub workers: NonZeroUsize,

    /// Per-code fetch timeout in seconds.
    #[arg(long, env = "QUOTE_SCRAPER_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Wall-clock ceiling for the whole run, in seconds.
    #[arg(long, env = "QUOTE_SCRAPER_RUN_TIMEOUT_SECS")]
    pub run_timeout_secs: Option<u64>,

    /// How many times a failed append is retried before the row is dropped.
    #[arg(long, env = "QUOTE_SCRAPER_WRITE_RETRIES", default_value_t = DEFAULT_WRITE_RETRIES)]
    pub write_retries: u32,

    /// Final CSV artifact.
    #[arg(short = 'o', long, env = "QUOTE_SCRAPER_OUTPUT", default_value = DEFAULT_FINAL_PATH, value_parser = parse_path)]
    pub output: PathBuf,

    /// Temporary append-only store.
    #[arg(long, env = "QUOTE_SCRAPER_TEMP", default_value = DEFAULT_TEMP_PATH, value_parser = parse_path)]
    pub temp: PathBuf,

    /// Quote page base URL; the code is appended as `?sym=<code>`.
    #[arg(long, env = "QUOTE_SCRAPER_BASE_URL", default_value = HKEX_QUOTE_URL)]
    pub base_url: String,

    /// Diagnostic log file, appended to.
    #[arg(long, env = "QUOTE_SCRAPER_LOG_FILE", default_value = DEFAULT_LOG_FILE, value_parser = parse_path)]
    pub log_file: PathBuf,

    /// Log to stderr only.
    #[arg(long)]
    pub no_log_file: bool,
}

impl Args {
    /// Log file to tee into, if any.
    pub fn log_target(&self) -> Option<PathBuf> {
        (!self.no_log_file).then(|| self.log_file.clone())
    }
}

/// Trims whitespace and one pair of surrounding quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn parse_path(raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    if no_quotes.is_empty() {
        return Err("path must not be empty".to_string());
    }
    Ok(PathBuf::from(no_quotes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_cli() {
        let args = Args::try_parse_from(["quote_scraper"]).unwrap();
        assert_eq!(args.count.get(), 50);
        assert_eq!(args.workers.get(), 8);
        assert_eq!(args.timeout_secs, 25);
        assert_eq!(args.write_retries, 1);
        assert_eq!(args.output, PathBuf::from("stock_data.csv"));
        assert_eq!(args.temp, PathBuf::from("stock_data_temp.csv"));
        assert!(args.codes_file.is_none());
        assert_eq!(args.log_target(), Some(PathBuf::from("stock_scraper_debug.log")));
    }

    #[test]
    fn count_must_be_positive() {
        assert!(Args::try_parse_from(["quote_scraper", "-n", "0"]).is_err());
        assert!(Args::try_parse_from(["quote_scraper", "-n", "-3"]).is_err());
        let args = Args::try_parse_from(["quote_scraper", "-n", "120"]).unwrap();
        assert_eq!(args.count.get(), 120);
    }

    #[test]
    fn quoted_paths_are_unwrapped() {
        let args =
            Args::try_parse_from(["quote_scraper", "--codes-file", " \"C:\\data\\codes.txt\" "])
                .unwrap();
        assert_eq!(args.codes_file, Some(PathBuf::from("C:\\data\\codes.txt")));
    }

    #[test]
    fn no_log_file_disables_the_tee() {
        let args = Args::try_parse_from(["quote_scraper", "--no-log-file"]).unwrap();
        assert_eq!(args.log_target(), None);
    }
}
