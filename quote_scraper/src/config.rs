//! Run configuration assembled from the command line.
//!
//! `ScraperConfig` is built once in `main` and its parts are handed to each
//! component at construction; nothing reads settings from globals.
use std::fs::{self, File};
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::path::{self, Path, PathBuf};
use std::time::Duration;

use quote_common::StockCode;
use quote_common::code::parse_codes;
use quote_common::error::InputError;
use quote_common::universe::CodeUniverse;

use crate::args::Args;
use crate::pool::PoolConfig;
use crate::session::SessionConfig;

/// Where the codes for a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSource {
    /// First `n` codes of the universe.
    FirstN(NonZeroUsize),
    /// Fixed list read from a file.
    File(PathBuf),
}

/// Validated settings for one scraper run.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Codes to scrape.
    pub codes: CodeSource,
    /// Worker count.
    pub workers: NonZeroUsize,
    /// Pool behaviour.
    pub pool: PoolConfig,
    /// Session launch settings.
    pub session: SessionConfig,
    /// Quote page base URL.
    pub base_url: String,
    /// Wall-clock ceiling for the run.
    pub run_timeout: Option<Duration>,
    /// Temporary store path.
    pub temp_path: PathBuf,
    /// Final artifact path.
    pub output_path: PathBuf,
}

impl TryFrom<Args> for ScraperConfig {
    type Error = InputError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.timeout_secs == 0 {
            return Err(InputError::Config("--timeout-secs must be positive".into()));
        }
        if args.run_timeout_secs == Some(0) {
            return Err(InputError::Config("--run-timeout-secs must be positive".into()));
        }
        let base_url = args.base_url.trim().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(InputError::Config(format!(
                "--base-url must be an http(s) URL, got {:?}",
                base_url
            )));
        }
        if same_location(&args.temp, &args.output) {
            return Err(InputError::Config(
                "--temp and --output must be different files".into(),
            ));
        }

        Ok(Self {
            codes: match args.codes_file {
                Some(path) => CodeSource::File(path),
                None => CodeSource::FirstN(args.count),
            },
            workers: args.workers,
            pool: PoolConfig {
                fetch_timeout: Duration::from_secs(args.timeout_secs),
                write_retries: args.write_retries,
            },
            session: SessionConfig::default(),
            base_url,
            run_timeout: args.run_timeout_secs.map(Duration::from_secs),
            temp_path: args.temp,
            output_path: args.output,
        })
    }
}

/// Whether two paths name the same file, whether or not it exists yet.
fn same_location(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (fs::canonicalize(a), fs::canonicalize(b)) {
        return a == b;
    }
    match (path::absolute(a), path::absolute(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

impl ScraperConfig {
    /// Resolves the code list for this run.
    pub fn load_codes(&self) -> Result<Vec<StockCode>, InputError> {
        match &self.codes {
            CodeSource::FirstN(n) => CodeUniverse::hkex().generate(n.get()),
            CodeSource::File(path) => parse_codes(BufReader::new(File::open(path)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(argv: &[&str]) -> Result<ScraperConfig, InputError> {
        let mut full = vec!["quote_scraper"];
        full.extend_from_slice(argv);
        ScraperConfig::try_from(Args::try_parse_from(full).unwrap())
    }

    #[test]
    fn default_run_takes_first_fifty_codes() {
        let cfg = config(&[]).unwrap();
        let codes = cfg.load_codes().unwrap();
        assert_eq!(codes.len(), 50);
        assert_eq!(codes[0].as_str(), "00001");
        assert_eq!(cfg.pool.fetch_timeout, Duration::from_secs(25));
        assert_eq!(cfg.run_timeout, None);
    }

    #[test]
    fn codes_file_overrides_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.txt");
        std::fs::write(&path, "00700\n00005\n").unwrap();
        let path_arg = path.to_string_lossy().to_string();

        let cfg = config(&["-n", "10", "--codes-file", path_arg.as_str()]).unwrap();
        assert_eq!(cfg.codes, CodeSource::File(path.clone()));
        let codes: Vec<String> = cfg.load_codes().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(codes, ["00700", "00005"]);
    }

    #[test]
    fn count_beyond_universe_fails_on_load() {
        let cfg = config(&["-n", "100000"]).unwrap();
        assert!(matches!(
            cfg.load_codes(),
            Err(InputError::CountExceedsUniverse { .. })
        ));
    }

    #[test]
    fn rejects_zero_timeouts_and_bad_urls() {
        assert!(matches!(config(&["--timeout-secs", "0"]), Err(InputError::Config(_))));
        assert!(matches!(config(&["--run-timeout-secs", "0"]), Err(InputError::Config(_))));
        assert!(matches!(config(&["--base-url", "ftp://x"]), Err(InputError::Config(_))));
        assert!(matches!(
            config(&["--temp", "same.csv", "-o", "same.csv"]),
            Err(InputError::Config(_))
        ));
    }

    #[test]
    fn temp_and_output_spelled_differently_are_still_the_same_file() {
        assert!(matches!(
            config(&["--temp", "./stock_data.csv", "-o", "stock_data.csv"]),
            Err(InputError::Config(_))
        ));
        assert!(config(&["--temp", "./stock_data_temp.csv", "-o", "stock_data.csv"]).is_ok());
    }

    #[test]
    fn missing_codes_file_is_input_error() {
        let cfg = config(&["--codes-file", "/nonexistent/codes.txt"]).unwrap();
        assert!(matches!(cfg.load_codes(), Err(InputError::Io(_))));
    }
}
