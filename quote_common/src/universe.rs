//! The known universe of HKEX equity codes targeted by the scraper.

use std::ops::RangeInclusive;

use crate::code::StockCode;
use crate::error::InputError;

/// Numeric code ranges, in scrape order.
const HKEX_RANGES: [RangeInclusive<u32>; 4] = [1..=2649, 3300..=3399, 3600..=3699, 9850..=9999];

/// Width codes are zero-padded to.
pub const CODE_WIDTH: usize = 5;

/// Ordered, fixed set of codes that `generate` draws from.
#[derive(Debug, Clone)]
pub struct CodeUniverse {
    ranges: Vec<RangeInclusive<u32>>,
}

impl Default for CodeUniverse {
    fn default() -> Self {
        Self::hkex()
    }
}

impl CodeUniverse {
    /// HKEX main board and related ranges.
    pub fn hkex() -> Self {
        Self {
            ranges: HKEX_RANGES.to_vec(),
        }
    }

    /// Universe over arbitrary ranges; used by tests and alternative markets.
    pub fn from_ranges(ranges: Vec<RangeInclusive<u32>>) -> Self {
        Self { ranges }
    }

    /// Number of codes in the universe.
    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|r| r.clone().count())
            .sum()
    }

    /// Whether the universe holds no codes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the first `count` codes in universe order.
    pub fn generate(&self, count: usize) -> Result<Vec<StockCode>, InputError> {
        if count == 0 {
            return Err(InputError::ZeroCount);
        }
        let available = self.len();
        if count > available {
            return Err(InputError::CountExceedsUniverse {
                requested: count,
                available,
            });
        }

        Ok(self
            .ranges
            .iter()
            .flat_map(|r| r.clone())
            .take(count)
            .map(|n| StockCode::new(format!("{:0width$}", n, width = CODE_WIDTH)))
            .collect())
    }
}
