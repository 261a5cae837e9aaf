//! Fetcher contract and the HKEX implementation.
//!
//! A fetcher turns one code into one `QuoteRecord`. Expected failures
//! (timeout, missing page, unparsable page) come back as records with a
//! non-OK status; only a broken session is reported as `FetchFatalError`.
use std::time::Duration;

use quote_common::error::FetchFatalError;
use quote_common::{QuoteRecord, StockCode};

pub mod hkex;
pub mod page;

pub use hkex::HkexFetcher;

/// Loads the quote page for a code inside a worker's context.
pub trait Fetcher<C>: Sync {
    /// Fetches `code` within `timeout`. Calls share no state.
    fn fetch(
        &self,
        context: &mut C,
        code: &StockCode,
        timeout: Duration,
    ) -> Result<QuoteRecord, FetchFatalError>;
}
