//! Run accounting.
use std::collections::HashMap;
use std::fmt;

use quote_common::QuoteStatus;

/// What happened to the codes handed to a pool run.
///
/// `dispatched + orphaned + skipped` equals the number of input codes, and
/// every dispatched or orphaned code was either recorded or write-dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Codes a worker pulled and fetched.
    pub dispatched: usize,
    /// Codes left in the queue after every worker retired, recorded as `ERROR`.
    pub orphaned: usize,
    /// Codes never dispatched because the run was cancelled.
    pub skipped: usize,
    /// Records appended to the store.
    pub recorded: usize,
    /// Records dropped after exhausting write retries.
    pub write_dropped: usize,
    /// Workers that stopped early because their session could not be relaunched.
    pub retired_workers: usize,
    /// Whether a worker stopped on cancellation with codes still queued.
    pub cancelled: bool,
    by_status: HashMap<QuoteStatus, usize>,
}

impl RunReport {
    pub(crate) fn record(&mut self, status: QuoteStatus) {
        self.recorded += 1;
        *self.by_status.entry(status).or_insert(0) += 1;
    }

    pub(crate) fn merge(&mut self, other: RunReport) {
        self.dispatched += other.dispatched;
        self.orphaned += other.orphaned;
        self.skipped += other.skipped;
        self.recorded += other.recorded;
        self.write_dropped += other.write_dropped;
        self.retired_workers += other.retired_workers;
        self.cancelled |= other.cancelled;
        for (status, n) in other.by_status {
            *self.by_status.entry(status).or_insert(0) += n;
        }
    }

    /// Recorded rows with the given status.
    pub fn count(&self, status: QuoteStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dispatched={} Recorded={} Dropped={} Orphaned={} Skipped={}",
            self.dispatched, self.recorded, self.write_dropped, self.orphaned, self.skipped
        )?;
        for status in QuoteStatus::ALL {
            write!(f, " {}={}", status, self.count(status))?;
        }
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_counts() {
        let mut a = RunReport::default();
        a.dispatched = 2;
        a.record(QuoteStatus::Ok);
        a.record(QuoteStatus::Timeout);

        let mut b = RunReport::default();
        b.dispatched = 1;
        b.retired_workers = 1;
        b.record(QuoteStatus::Ok);

        a.merge(b);
        assert_eq!(a.dispatched, 3);
        assert_eq!(a.recorded, 3);
        assert_eq!(a.count(QuoteStatus::Ok), 2);
        assert_eq!(a.count(QuoteStatus::Timeout), 1);
        assert_eq!(a.count(QuoteStatus::Error), 0);
        assert_eq!(a.retired_workers, 1);
        assert!(!a.cancelled);
    }
}
