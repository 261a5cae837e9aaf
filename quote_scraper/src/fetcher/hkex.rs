//! HKEX equities quote fetcher over plain HTTP.
use std::time::Duration;

use chrono::{Local, NaiveDate};
use log::{debug, warn};
use quote_common::error::FetchFatalError;
use quote_common::{QuoteRecord, QuoteStatus, StockCode};
use reqwest::StatusCode;

use super::Fetcher;
use super::page::{is_not_found, parse_quote_page};
use crate::session::HttpContext;

/// Fetches `{base_url}?sym={symbol}` and extracts the quote fields.
#[derive(Debug, Clone)]
pub struct HkexFetcher {
    base_url: String,
}

impl HkexFetcher {
    /// Fetcher against the given quote page URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Quote page URL for a code.
    pub fn quote_url(&self, code: &StockCode) -> String {
        format!("{}?sym={}", self.base_url, code.symbol())
    }
}

impl Fetcher<HttpContext> for HkexFetcher {
    fn fetch(
        &self,
        context: &mut HttpContext,
        code: &StockCode,
        timeout: Duration,
    ) -> Result<QuoteRecord, FetchFatalError> {
        let date = Local::now().date_naive();
        let url = self.quote_url(code);
        debug!("Worker {} loading {}", context.worker_id(), url);

        let response = match context.get(&url, timeout) {
            Ok(response) => response,
            Err(e) => return classify(e, code, date),
        };

        let status = response.status();
        let final_url = response.url().to_string();
        if status == StatusCode::NOT_FOUND || is_not_found(&final_url, "") {
            return Ok(QuoteRecord::failed(code.clone(), Some(date), QuoteStatus::NotFound));
        }
        if !status.is_success() {
            warn!("{} answered {} for {}", final_url, status, code);
            return Ok(QuoteRecord::failed(code.clone(), Some(date), QuoteStatus::Error));
        }

        match response.text() {
            Ok(body) => Ok(parse_quote_page(code.clone(), date, &final_url, &body)),
            Err(e) => classify(e, code, date),
        }
    }
}

/// Maps a transport error to a record, or to a fatal error when the host is unreachable.
fn classify(
    e: reqwest::Error,
    code: &StockCode,
    date: NaiveDate,
) -> Result<QuoteRecord, FetchFatalError> {
    if e.is_timeout() {
        debug!("Timeout loading {}: {}", code, e);
        Ok(QuoteRecord::failed(code.clone(), Some(date), QuoteStatus::Timeout))
    } else if e.is_connect() {
        Err(FetchFatalError::new(format!("cannot connect for {}: {}", code, e)))
    } else {
        warn!("Request for {} failed: {}", code, e);
        Ok(QuoteRecord::failed(code.clone(), Some(date), QuoteStatus::Error))
    }
}
