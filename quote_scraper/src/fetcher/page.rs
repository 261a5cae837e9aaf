//! Field extraction from an HKEX equities quote page.
//!
//! The page layout is treated as volatile external data: every field is
//! optional and anything that does not match is left empty.
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use quote_common::{QuoteRecord, QuoteStatus, StockCode};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use scraper::{Html, Selector};

static PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HK\$\s*([\d,]+\.\d+)").expect("price pattern"));
static PE_RATIO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d,]+\.\d+)\s*x").expect("p/e pattern"));
static VOLUME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(?:([KMB])\b)?").expect("volume pattern"));

/// Classes that must show a price before the page counts as loaded.
const READINESS_CLASSES: [&str; 5] = ["col_open", "col_high", "col_low", "col_prevcls", "col_volume"];
/// Minimum number of readiness classes carrying `HK$`.
const READINESS_THRESHOLD: usize = 2;

/// Whether the response is the exchange's "page not found" page.
pub fn is_not_found(final_url: &str, body: &str) -> bool {
    final_url.contains("404.aspx") || body.to_lowercase().contains("page requested")
}

/// Builds the record for a loaded page.
pub fn parse_quote_page(code: StockCode, date: NaiveDate, final_url: &str, body: &str) -> QuoteRecord {
    if is_not_found(final_url, body) {
        return QuoteRecord::failed(code, Some(date), QuoteStatus::NotFound);
    }

    let document = Html::parse_document(body);
    let ready = READINESS_CLASSES
        .iter()
        .filter(|class| first_text(&document, class).is_some_and(|t| t.contains("HK$")))
        .count();
    if ready < READINESS_THRESHOLD {
        return QuoteRecord::failed(code, Some(date), QuoteStatus::ParseError);
    }

    let price = |class: &str| first_text(&document, class).and_then(|t| capture(&PRICE, &t));
    QuoteRecord {
        open: price("col_open"),
        intraday_high: price("col_high"),
        intraday_low: price("col_low"),
        close: price("col_prevcls"),
        pe_ratio: first_text(&document, "col_pe").and_then(|t| capture(&PE_RATIO, &t)),
        volume: first_text(&document, "col_volume").and_then(|t| parse_volume(&t)),
        ..QuoteRecord::failed(code, Some(date), QuoteStatus::Ok)
    }
}

/// Number of shares from text like `15.3M`, `820K` or `1,204,000`.
pub fn parse_volume(text: &str) -> Option<u64> {
    let caps = VOLUME.captures(text)?;
    let number = Decimal::from_str(&caps[1].replace(',', "")).ok()?;
    let scale: u64 = match caps.get(2).map(|m| m.as_str().to_ascii_uppercase()) {
        Some(s) if s == "K" => 1_000,
        Some(s) if s == "M" => 1_000_000,
        Some(s) if s == "B" => 1_000_000_000,
        _ => 1,
    };
    number.checked_mul(Decimal::from(scale))?.trunc().to_u64()
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].replace(',', ""))
}

fn first_text(document: &Html, class: &str) -> Option<String> {
    let selector = Selector::parse(&format!(".{}", class)).ok()?;
    document
        .select(&selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.hkex.com.hk/Market-Data/Securities-Prices/Equities/Equities-Quote?sym=700";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn quote_page(volume: &str) -> String {
        format!(
            r#"<html><body>
              <div class="col_open"><span>Open</span> <dt>HK$318.20</dt></div>
              <div class="col_high">HK$322.40</div>
              <div class="col_low">HK$317.00</div>
              <div class="col_prevcls">Prev. Close HK$320.00</div>
              <div class="col_pe">P/E 18.52x</div>
              <div class="col_volume">{}</div>
            </body></html>"#,
            volume
        )
    }

    #[test]
    fn extracts_every_field() {
        let rec = parse_quote_page("00700".into(), date(), URL, &quote_page("15.3M"));

        assert_eq!(rec.status, QuoteStatus::Ok);
        assert_eq!(rec.date, Some(date()));
        assert_eq!(rec.open.as_deref(), Some("318.20"));
        assert_eq!(rec.intraday_high.as_deref(), Some("322.40"));
        assert_eq!(rec.intraday_low.as_deref(), Some("317.00"));
        assert_eq!(rec.close.as_deref(), Some("320.00"));
        assert_eq!(rec.pe_ratio.as_deref(), Some("18.52"));
        assert_eq!(rec.volume, Some(15_300_000));
    }

    #[test]
    fn missing_optional_fields_stay_empty() {
        let body = r#"<div class="col_open">HK$1.10</div><div class="col_low">HK$1.00</div>"#;
        let rec = parse_quote_page("00002".into(), date(), URL, body);

        assert_eq!(rec.status, QuoteStatus::Ok);
        assert_eq!(rec.open.as_deref(), Some("1.10"));
        assert_eq!(rec.close, None);
        assert_eq!(rec.pe_ratio, None);
        assert_eq!(rec.volume, None);
    }

    #[test]
    fn page_without_prices_is_parse_error() {
        let body = r#"<div class="col_open">-</div><div class="col_high">HK$2.00</div>"#;
        let rec = parse_quote_page("00003".into(), date(), URL, body);
        assert_eq!(rec, QuoteRecord::failed("00003".into(), Some(date()), QuoteStatus::ParseError));
    }

    #[test]
    fn not_found_by_url_or_body() {
        let by_url = parse_quote_page("00004".into(), date(), "https://www.hkex.com.hk/404.aspx", "");
        assert_eq!(by_url.status, QuoteStatus::NotFound);

        let body = "<p>The Page Requested cannot be found.</p>";
        let by_body = parse_quote_page("00004".into(), date(), URL, body);
        assert_eq!(by_body.status, QuoteStatus::NotFound);
        assert_eq!(by_body.open, None);
    }

    #[test]
    fn volume_suffixes_scale_exactly() {
        assert_eq!(parse_volume("15.3M"), Some(15_300_000));
        assert_eq!(parse_volume("1.23M"), Some(1_230_000));
        assert_eq!(parse_volume("820K"), Some(820_000));
        assert_eq!(parse_volume("2.5b"), Some(2_500_000_000));
        assert_eq!(parse_volume("1,204,000"), Some(1_204_000));
        assert_eq!(parse_volume("0.0005K"), Some(0));
        assert_eq!(parse_volume("-"), None);
    }

    #[test]
    fn following_word_is_not_a_suffix() {
        assert_eq!(parse_volume("1,000 board lots"), Some(1_000));
        assert_eq!(parse_volume("3.2 MM"), Some(3));
        assert_eq!(parse_volume("820 K shares"), Some(820_000));
    }

    #[test]
    fn prices_drop_thousands_separators() {
        let body = r#"<div class="col_open">HK$1,234.50</div><div class="col_high">HK$1,240.00</div>"#;
        let rec = parse_quote_page("00388".into(), date(), URL, body);
        assert_eq!(rec.open.as_deref(), Some("1234.50"));
        assert_eq!(rec.intraday_high.as_deref(), Some("1240.00"));
    }
}
