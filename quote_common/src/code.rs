//! Stock code identifiers and the fixed-list parser.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::io::BufRead;

use crate::error::InputError;

/// Identifier of one tradable instrument on the exchange.
///
/// Ordering puts all-digit codes first, compared by numeric value, and all
/// other codes after them in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockCode(String);

impl StockCode {
    /// Wraps a code string as-is.
    pub fn new(code: impl Into<String>) -> Self {
        StockCode(code.into())
    }

    /// Raw code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form used in the quote page URL: numeric codes lose their zero padding.
    pub fn symbol(&self) -> &str {
        if self.is_numeric() {
            let trimmed = self.0.trim_start_matches('0');
            if trimmed.is_empty() { "0" } else { trimmed }
        } else {
            &self.0
        }
    }

    fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StockCode {
    fn from(code: &str) -> Self {
        StockCode::new(code)
    }
}

impl Ord for StockCode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, true) => {
                let a = self.0.trim_start_matches('0');
                let b = other.0.trim_start_matches('0');
                // unpadded digit strings: shorter means smaller
                a.len()
                    .cmp(&b.len())
                    .then_with(|| a.cmp(b))
                    .then_with(|| self.0.cmp(&other.0))
            }
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for StockCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reads a fixed list of codes, one per line.
///
/// Blank lines and lines starting with `#` are skipped; surrounding
/// whitespace is trimmed. Returns an error if the list ends up empty.
pub fn parse_codes<R: BufRead>(reader: R) -> Result<Vec<StockCode>, InputError> {
    let mut codes = Vec::new();

    for line_result in reader.lines() {
        let line = line_result?;
        let trimmed_line = line.trim();
        if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
            continue;
        }
        codes.push(StockCode::new(trimmed_line));
    }

    if codes.is_empty() {
        return Err(InputError::EmptyCodeList);
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn codes(raw: &[&str]) -> Vec<StockCode> {
        raw.iter().map(|c| StockCode::from(*c)).collect()
    }

    #[test]
    fn numeric_codes_sort_by_value() {
        let mut list = codes(&["10", "9", "00700", "1", "0005"]);
        list.sort();
        assert_eq!(list, codes(&["1", "0005", "9", "10", "00700"]));
    }

    #[test]
    fn padded_codes_sort_like_strings() {
        let mut list = codes(&["02649", "00001", "00700", "03300"]);
        let mut lexical = list.clone();
        list.sort();
        lexical.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        assert_eq!(list, lexical);
    }

    #[test]
    fn numeric_codes_precede_alphanumeric() {
        let mut list = codes(&["1a", "2", "10", "A"]);
        list.sort();
        assert_eq!(list, codes(&["2", "10", "1a", "A"]));
    }

    #[test]
    fn same_value_with_different_padding_is_not_equal() {
        let a = StockCode::from("01");
        let b = StockCode::from("1");
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn symbol_strips_padding() {
        assert_eq!(StockCode::from("00700").symbol(), "700");
        assert_eq!(StockCode::from("00000").symbol(), "0");
        assert_eq!(StockCode::from("HSBC").symbol(), "HSBC");
    }

    #[test]
    fn parse_codes_skips_blank_and_comment_lines() {
        let input = "# watchlist\n00001\n\n  00700  \n#00005\n02800\n";
        let parsed = parse_codes(Cursor::new(input)).unwrap();
        assert_eq!(parsed, codes(&["00001", "00700", "02800"]));
    }

    #[test]
    fn parse_codes_rejects_empty_list() {
        let err = parse_codes(Cursor::new("\n# nothing\n")).unwrap_err();
        assert!(matches!(err, InputError::EmptyCodeList));
    }
}
