//! Quote row model.
//!
//! A `QuoteRecord` is one output row: the code, the retrieval date, the
//! scraped price fields and a `QuoteStatus`. Every dispatched code yields
//! exactly one record; failures are expressed through the status with the
//! numeric fields left empty.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::code::StockCode;

/// CSV header, in column order.
pub const HEADERS: [&str; 9] = [
    "CODE",
    "DATE",
    "OPEN",
    "INTRADAY_HIGH",
    "INTRADAY_LOW",
    "CLOSE",
    "P/E",
    "VOLUME",
    "STATUS",
];

/// Outcome of fetching one code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    /// Page loaded and data was extracted.
    Ok,
    /// The page did not load within the per-call timeout.
    Timeout,
    /// The exchange has no quote page for the code.
    NotFound,
    /// The page loaded but carried no recognisable quote data.
    ParseError,
    /// Any other failure, including session crashes.
    Error,
}

impl QuoteStatus {
    /// All statuses in declaration order.
    pub const ALL: [QuoteStatus; 5] = [
        QuoteStatus::Ok,
        QuoteStatus::Timeout,
        QuoteStatus::NotFound,
        QuoteStatus::ParseError,
        QuoteStatus::Error,
    ];
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Stock code.
    #[serde(rename = "CODE")]
    pub code: StockCode,
    /// Date the quote was retrieved.
    #[serde(rename = "DATE", with = "yyyymmdd")]
    pub date: Option<NaiveDate>,
    /// Opening price.
    #[serde(rename = "OPEN")]
    pub open: Option<String>,
    /// Intraday high.
    #[serde(rename = "INTRADAY_HIGH")]
    pub intraday_high: Option<String>,
    /// Intraday low.
    #[serde(rename = "INTRADAY_LOW")]
    pub intraday_low: Option<String>,
    /// Closing price.
    #[serde(rename = "CLOSE")]
    pub close: Option<String>,
    /// Price/earnings ratio.
    #[serde(rename = "P/E")]
    pub pe_ratio: Option<String>,
    /// Traded volume in shares.
    #[serde(rename = "VOLUME")]
    pub volume: Option<u64>,
    /// Fetch outcome.
    #[serde(rename = "STATUS")]
    pub status: QuoteStatus,
}

impl QuoteRecord {
    /// Record with the given status and no numeric fields.
    pub fn failed(code: StockCode, date: Option<NaiveDate>, status: QuoteStatus) -> Self {
        QuoteRecord {
            code,
            date,
            open: None,
            intraday_high: None,
            intraday_low: None,
            close: None,
            pe_ratio: None,
            volume: None,
            status,
        }
    }

    /// `ERROR` record carrying only the code.
    pub fn error(code: StockCode) -> Self {
        Self::failed(code, None, QuoteStatus::Error)
    }

    /// Whether the fetch succeeded.
    pub fn is_ok(&self) -> bool {
        self.status == QuoteStatus::Ok
    }
}

/// `YYYYMMDD` dates, empty when absent.
mod yyyymmdd {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y%m%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(d)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, FORMAT)
            .map(Some)
            .map_err(de::Error::custom)
    }
}
